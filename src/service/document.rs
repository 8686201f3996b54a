//! Persistence document for generated schedules.
//!
//! A [`ScheduleDocument`] is the owned, serializable form of a
//! [`Schedule`]: the configuration plus one row per entry, with teachers and
//! classrooms referenced by id. Restoring resolves every row against the
//! caller's reference data and re-inserts it through [`Schedule::add`], so a
//! document that double-books anything is refused.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{
    Class, Classroom, Schedule, ScheduleConfig, ScheduleEntry, Teacher, TimetableError, WeekDay,
};

/// Failure reading, writing or restoring a document.
#[derive(Debug)]
pub enum DocumentError {
    Json(serde_json::Error),
    Io(std::io::Error),
    UnknownClass(String),
    UnknownSubject { class: String, subject: String },
    UnknownTeacher(String),
    UnknownClassroom(String),
    InvalidSlot(TimetableError),
    /// A row would double-book a class, teacher or classroom.
    Conflict {
        class: String,
        subject: String,
        weekday: WeekDay,
        period: u32,
    },
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::Json(e) => write!(f, "malformed schedule document: {e}"),
            DocumentError::Io(e) => write!(f, "schedule document I/O failed: {e}"),
            DocumentError::UnknownClass(c) => write!(f, "unknown class: {c}"),
            DocumentError::UnknownSubject { class, subject } => {
                write!(f, "class {class} has no subject {subject}")
            }
            DocumentError::UnknownTeacher(t) => write!(f, "unknown teacher id: {t}"),
            DocumentError::UnknownClassroom(r) => write!(f, "unknown classroom id: {r}"),
            DocumentError::InvalidSlot(e) => write!(f, "invalid slot: {e}"),
            DocumentError::Conflict {
                class,
                subject,
                weekday,
                period,
            } => write!(
                f,
                "{subject} for {class} on {weekday} period {period} conflicts with an earlier row"
            ),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Json(e) => Some(e),
            DocumentError::Io(e) => Some(e),
            DocumentError::InvalidSlot(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        DocumentError::Json(e)
    }
}

impl From<std::io::Error> for DocumentError {
    fn from(e: std::io::Error) -> Self {
        DocumentError::Io(e)
    }
}

impl From<TimetableError> for DocumentError {
    fn from(e: TimetableError) -> Self {
        DocumentError::InvalidSlot(e)
    }
}

/// One stored entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub class: String,
    pub subject: String,
    /// Teacher id.
    pub teacher: String,
    /// Classroom id.
    pub classroom: String,
    pub weekday: WeekDay,
    pub period: u32,
    /// `"HH:MM-HH:MM"`, informational; recomputed on restore.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub is_fixed: bool,
}

/// Serializable snapshot of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    pub config: ScheduleConfig,
    pub entries: Vec<DocumentEntry>,
}

impl ScheduleDocument {
    /// Snapshots `schedule`.
    pub fn from_schedule(schedule: &Schedule<'_>) -> Self {
        let entries = schedule
            .entries()
            .iter()
            .map(|e| DocumentEntry {
                class: e.class.name.clone(),
                subject: e.subject.name.clone(),
                teacher: e.teacher.id.clone(),
                classroom: e.classroom.id.clone(),
                weekday: e.time_slot.weekday,
                period: e.time_slot.period,
                time: e.time_slot.time_range(),
                is_fixed: e.is_fixed,
            })
            .collect();
        Self {
            config: schedule.config().clone(),
            entries,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the document to `path` as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reads a document from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Rebuilds the schedule against the given reference data.
    ///
    /// Rows are re-inserted in document order; the first unresolvable or
    /// conflicting row aborts the restore.
    pub fn restore<'a>(
        &self,
        classes: &'a [Class],
        teachers: &'a [Teacher],
        classrooms: &'a [Classroom],
    ) -> Result<Schedule<'a>, DocumentError> {
        let mut schedule = Schedule::new(self.config.clone());

        for row in &self.entries {
            let class = classes
                .iter()
                .find(|c| c.name == row.class)
                .ok_or_else(|| DocumentError::UnknownClass(row.class.clone()))?;
            let subject =
                class
                    .subject(&row.subject)
                    .ok_or_else(|| DocumentError::UnknownSubject {
                        class: row.class.clone(),
                        subject: row.subject.clone(),
                    })?;
            let teacher = teachers
                .iter()
                .find(|t| t.id == row.teacher)
                .ok_or_else(|| DocumentError::UnknownTeacher(row.teacher.clone()))?;
            let classroom = classrooms
                .iter()
                .find(|r| r.id == row.classroom)
                .ok_or_else(|| DocumentError::UnknownClassroom(row.classroom.clone()))?;
            let slot = self.config.timetable.slot(row.weekday, row.period)?;

            let mut entry = ScheduleEntry::new(class, subject, teacher, classroom, slot);
            if row.is_fixed {
                entry = entry.fixed();
            }
            if !schedule.add(entry) {
                return Err(DocumentError::Conflict {
                    class: row.class.clone(),
                    subject: row.subject.clone(),
                    weekday: row.weekday,
                    period: row.period,
                });
            }
        }

        Ok(schedule)
    }
}
