//! Transport shapes of the service facade.

use serde::{Deserialize, Serialize};

use crate::models::time_slot::clock;
use crate::models::{Class, Classroom, Schedule, ScheduleConfig, ScheduleEntry, Teacher, WeekDay};

/// How weekdays are rendered in entry records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayStyle {
    /// `"monday"`
    #[default]
    Name,
    /// `"一"`
    ShortLabel,
}

impl WeekdayStyle {
    /// Renders `day` in this style.
    pub fn label(&self, day: WeekDay) -> &'static str {
        match self {
            WeekdayStyle::Name => day.name(),
            WeekdayStyle::ShortLabel => day.short_label(),
        }
    }
}

/// One outbound timetable row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub class: String,
    pub subject: String,
    /// Teacher display name.
    pub teacher: String,
    /// Classroom display name.
    pub classroom: String,
    pub weekday: String,
    pub period: u32,
    /// `"HH:MM-HH:MM"`.
    pub time: String,
}

impl EntryRecord {
    /// Renders one entry. The time string comes from `config`'s period
    /// layout, falling back to the slot's own clock range.
    pub fn from_entry(
        entry: &ScheduleEntry<'_>,
        config: &ScheduleConfig,
        style: WeekdayStyle,
    ) -> Self {
        let slot = &entry.time_slot;
        let time = config
            .timetable
            .period_time(slot.period)
            .map(|(start, end)| {
                format!("{}-{}", start.format(clock::FORMAT), end.format(clock::FORMAT))
            })
            .unwrap_or_else(|_| slot.time_range());

        Self {
            class: entry.class.name.clone(),
            subject: entry.subject.name.clone(),
            teacher: entry.teacher.name.clone(),
            classroom: entry.classroom.name.clone(),
            weekday: style.label(slot.weekday).to_string(),
            period: slot.period,
            time,
        }
    }
}

/// Renders every entry of `schedule`, in schedule order.
pub fn format_schedule(schedule: &Schedule<'_>, style: WeekdayStyle) -> Vec<EntryRecord> {
    schedule
        .entries()
        .iter()
        .map(|e| EntryRecord::from_entry(e, schedule.config(), style))
        .collect()
}

/// Inbound generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Overrides the service configuration when present.
    #[serde(default)]
    pub config: Option<ScheduleConfig>,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub classrooms: Vec<Classroom>,
}

/// Outbound generation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// True only when `errors` is empty.
    pub success: bool,
    pub schedule: Vec<EntryRecord>,
    pub errors: Vec<String>,
}

impl ScheduleResponse {
    /// Builds a response; success follows from the error list.
    pub fn new(schedule: Vec<EntryRecord>, errors: Vec<String>) -> Self {
        Self {
            success: errors.is_empty(),
            schedule,
            errors,
        }
    }

    /// A response with no entries.
    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            success: false,
            schedule: Vec::new(),
            errors,
        }
    }
}
