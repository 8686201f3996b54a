//! Subject model.
//!
//! A subject is a course taught to a class some number of periods per week.
//! It carries the placement preferences the rule engine consults: which
//! day-parts it may occupy, how many periods per day, which room types it
//! needs and which other subjects it must not sit next to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{DayPart, TimeSlot};

/// A subject taught to a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject name (unique within a class).
    pub name: String,
    /// Free-form grouping (e.g. "science", "language").
    #[serde(default)]
    pub category: String,
    /// Periods per week.
    pub weekly_hours: u32,
    /// Scheduling priority (higher = scheduled earlier).
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// Wants double periods. Recorded, not enforced by the built-in rules.
    #[serde(default)]
    pub requires_consecutive_periods: bool,
    /// Most periods of this subject a class may have on one day.
    #[serde(default = "default_max_per_day")]
    pub max_periods_per_day: u32,
    /// Day-parts the subject may be placed in.
    #[serde(default = "default_day_parts")]
    pub allowed_day_parts: BTreeSet<DayPart>,
    /// Subjects that must not be placed next to this one.
    #[serde(default)]
    pub conflicting_subjects: BTreeSet<String>,
    /// Room types (or equipment) the subject needs. Empty = any room.
    #[serde(default)]
    pub required_room_types: BTreeSet<String>,
}

fn default_priority() -> i32 {
    1
}

fn default_max_per_day() -> u32 {
    2
}

fn default_day_parts() -> BTreeSet<DayPart> {
    [DayPart::Morning, DayPart::Afternoon].into_iter().collect()
}

impl Subject {
    /// Creates a subject taught `weekly_hours` periods per week.
    ///
    /// Defaults: priority 1, at most 2 periods per day, mornings and
    /// afternoons allowed, any room.
    pub fn new(name: impl Into<String>, weekly_hours: u32) -> Self {
        Self {
            name: name.into(),
            category: String::new(),
            weekly_hours,
            priority: default_priority(),
            requires_consecutive_periods: false,
            max_periods_per_day: default_max_per_day(),
            allowed_day_parts: default_day_parts(),
            conflicting_subjects: BTreeSet::new(),
            required_room_types: BTreeSet::new(),
        }
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the scheduling priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the daily period cap.
    pub fn with_max_periods_per_day(mut self, max: u32) -> Self {
        self.max_periods_per_day = max;
        self
    }

    /// Replaces the allowed day-parts.
    pub fn with_day_parts(mut self, parts: impl IntoIterator<Item = DayPart>) -> Self {
        self.allowed_day_parts = parts.into_iter().collect();
        self
    }

    /// Marks another subject as conflicting.
    pub fn with_conflict(mut self, other: impl Into<String>) -> Self {
        self.conflicting_subjects.insert(other.into());
        self
    }

    /// Adds a required room type.
    pub fn with_room_type(mut self, room_type: impl Into<String>) -> Self {
        self.required_room_types.insert(room_type.into());
        self
    }

    /// Marks the subject as wanting consecutive periods (not enforced).
    pub fn with_consecutive_periods(mut self) -> Self {
        self.requires_consecutive_periods = true;
        self
    }

    /// Whether the slot's day-part is allowed for this subject.
    pub fn can_be_scheduled_at(&self, slot: &TimeSlot) -> bool {
        self.allowed_day_parts.contains(&slot.day_part)
    }

    /// Whether either subject lists the other as conflicting.
    pub fn conflicts_with(&self, other: &Subject) -> bool {
        self.conflicting_subjects.contains(&other.name)
            || other.conflicting_subjects.contains(&self.name)
    }
}
