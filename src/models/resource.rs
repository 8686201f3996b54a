//! Teacher and classroom models.
//!
//! Teachers and classrooms are the two resources a session occupies.
//! Both may declare availability windows; an empty window list means the
//! resource is always available (absence of data is not unavailability).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{Schedule, Subject, TimeSlot, WeekDay};

/// How much a teacher wants to teach a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceTier {
    /// The teacher must not be given this subject.
    Disabled,
    High,
    Normal,
    Low,
}

/// A teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Names of subjects this teacher can teach.
    #[serde(default)]
    pub subjects: BTreeSet<String>,
    /// Most periods per day.
    #[serde(default = "default_max_hours")]
    pub max_hours_per_day: u32,
    /// Availability windows. Empty = always available.
    #[serde(default)]
    pub available_times: Vec<TimeSlot>,
    /// Subject preferences.
    #[serde(default)]
    pub preferred_subjects: BTreeMap<String, PreferenceTier>,
}

fn default_max_hours() -> u32 {
    6
}

impl Teacher {
    /// Creates a teacher with no subjects and no availability restriction.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subjects: BTreeSet::new(),
            max_hours_per_day: default_max_hours(),
            available_times: Vec::new(),
            preferred_subjects: BTreeMap::new(),
        }
    }

    /// Adds a teachable subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.insert(subject.into());
        self
    }

    /// Sets the daily period cap.
    pub fn with_max_hours_per_day(mut self, max: u32) -> Self {
        self.max_hours_per_day = max;
        self
    }

    /// Adds an availability window.
    pub fn with_available_time(mut self, slot: TimeSlot) -> Self {
        self.available_times.push(slot);
        self
    }

    /// Records a subject preference.
    pub fn with_preference(mut self, subject: impl Into<String>, tier: PreferenceTier) -> Self {
        self.preferred_subjects.insert(subject.into(), tier);
        self
    }

    /// Whether the teacher can teach `subject`.
    pub fn can_teach(&self, subject: &str) -> bool {
        self.subjects.contains(subject)
    }

    /// Whether a declared window overlaps `slot` (always true with no windows).
    pub fn is_available_at(&self, slot: &TimeSlot) -> bool {
        self.available_times.is_empty()
            || self.available_times.iter().any(|w| w.overlaps_with(slot))
    }

    /// Preference tier for `subject`, if one is recorded.
    pub fn preference(&self, subject: &str) -> Option<PreferenceTier> {
        self.preferred_subjects.get(subject).copied()
    }

    /// Periods this teacher already teaches on `weekday`.
    pub fn daily_workload(&self, schedule: &Schedule<'_>, weekday: WeekDay) -> usize {
        schedule
            .entries_for_teacher(&self.id)
            .filter(|e| e.time_slot.weekday == weekday)
            .count()
    }
}

/// A classroom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub floor: i32,
    #[serde(default)]
    pub location: String,
    /// Room type (e.g. "regular", "lab", "gym").
    #[serde(default)]
    pub room_type: String,
    /// Seats.
    pub capacity: u32,
    #[serde(default)]
    pub is_special: bool,
    /// Installed equipment.
    #[serde(default)]
    pub equipment: BTreeSet<String>,
    /// Availability windows. Empty = always available.
    #[serde(default)]
    pub available_times: Vec<TimeSlot>,
}

impl Classroom {
    /// Creates a regular classroom.
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            floor: 0,
            location: String::new(),
            room_type: "regular".into(),
            capacity,
            is_special: false,
            equipment: BTreeSet::new(),
            available_times: Vec::new(),
        }
    }

    /// Sets the room type.
    pub fn with_room_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = room_type.into();
        self
    }

    /// Marks the room as special-purpose.
    pub fn special(mut self) -> Self {
        self.is_special = true;
        self
    }

    /// Adds an equipment item.
    pub fn with_equipment(mut self, item: impl Into<String>) -> Self {
        self.equipment.insert(item.into());
        self
    }

    /// Sets floor and location.
    pub fn located(mut self, floor: i32, location: impl Into<String>) -> Self {
        self.floor = floor;
        self.location = location.into();
        self
    }

    /// Adds an availability window.
    pub fn with_available_time(mut self, slot: TimeSlot) -> Self {
        self.available_times.push(slot);
        self
    }

    /// Whether the room fits the subject's required room types.
    ///
    /// A subject with no requirement fits any room. Otherwise the room type,
    /// or one of the installed equipment items, must be listed.
    pub fn is_suitable_for(&self, subject: &Subject) -> bool {
        subject.required_room_types.is_empty()
            || subject.required_room_types.contains(&self.room_type)
            || self
                .equipment
                .iter()
                .any(|e| subject.required_room_types.contains(e))
    }

    /// Whether a declared window overlaps `slot` (always true with no windows).
    pub fn is_available_at(&self, slot: &TimeSlot) -> bool {
        self.available_times.is_empty()
            || self.available_times.iter().any(|w| w.overlaps_with(slot))
    }
}
