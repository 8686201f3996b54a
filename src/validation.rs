//! Pre-search validation of configuration and reference data.
//!
//! Everything here runs before the first slot is searched. Any error
//! refuses the run outright; the checks collect every problem rather than
//! stopping at the first one.
//!
//! Configuration checks:
//! - At least one weekday, none repeated
//! - At least one period per day, positive class duration
//! - Period counts sum to a representable day length
//! - Evening periods need an evening start; no period runs past midnight
//! - Consecutive-subject limit and attempt budget are at least 1
//!
//! Reference-data checks:
//! - Unique teacher ids, classroom ids and class names
//! - Unique subject names within a class
//! - Head teacher references point at a known teacher

use std::collections::HashSet;

use crate::models::{Class, Classroom, ScheduleConfig, Teacher, TimetableError};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No teaching days configured.
    NoWeekdays,
    /// A weekday is listed twice.
    DuplicateWeekday,
    /// The day has zero periods.
    NoPeriods,
    /// Period counts add up past `u32::MAX`.
    PeriodOverflow,
    /// Class duration is zero or the layout runs past midnight.
    InvalidDuration,
    /// Evening periods are configured without an evening start.
    MissingEveningStart,
    /// Consecutive-subject limit is zero.
    InvalidThreshold,
    /// Attempt budget is zero.
    InvalidAttemptBudget,
    /// Two entities share the same identifier.
    DuplicateId,
    /// A reference points at an entity that does not exist.
    UnknownReference,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates a schedule configuration.
pub fn validate_config(config: &ScheduleConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.weekdays.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoWeekdays,
            "at least one teaching day must be configured",
        ));
    }
    let mut seen = HashSet::new();
    for day in &config.weekdays {
        if !seen.insert(day) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateWeekday,
                format!("weekday {day} is listed more than once"),
            ));
        }
    }

    let tt = &config.timetable;
    let total_periods = tt.checked_total_periods();
    match total_periods {
        None => errors.push(ValidationError::new(
            ValidationErrorKind::PeriodOverflow,
            format!(
                "period counts ({} + {} + {}) exceed {} periods per day",
                tt.periods_per_morning,
                tt.periods_per_afternoon,
                tt.periods_per_evening,
                u32::MAX
            ),
        )),
        Some(0) => errors.push(ValidationError::new(
            ValidationErrorKind::NoPeriods,
            "at least one period per day must be configured",
        )),
        Some(_) => {}
    }
    if tt.class_duration == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDuration,
            "class duration must be positive",
        ));
    }
    if tt.periods_per_evening > 0 && tt.evening_start.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingEveningStart,
            format!(
                "{} evening periods configured without an evening start time",
                tt.periods_per_evening
            ),
        ));
    } else if total_periods.is_some() && tt.class_duration > 0 {
        // Positive durations reach midnight within a day's worth of minutes
        if let Err(TimetableError::TimeOverflow(p)) = tt.all_periods() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("period {p} runs past midnight"),
            ));
        }
    }

    if config.max_consecutive_same_subject == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidThreshold,
            "max consecutive periods of one subject must be at least 1",
        ));
    }
    if config.max_attempts == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidAttemptBudget,
            "at least one search attempt is required",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the reference data of a generation request.
pub fn validate_input(
    classes: &[Class],
    teachers: &[Teacher],
    classrooms: &[Classroom],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut teacher_ids = HashSet::new();
    for t in teachers {
        if !teacher_ids.insert(t.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate teacher id: {}", t.id),
            ));
        }
    }

    let mut room_ids = HashSet::new();
    for r in classrooms {
        if !room_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate classroom id: {}", r.id),
            ));
        }
    }

    let mut class_names = HashSet::new();
    for class in classes {
        if !class_names.insert(class.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate class name: {}", class.name),
            ));
        }

        let mut subject_names = HashSet::new();
        for s in &class.subjects {
            if !subject_names.insert(s.name.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("class '{}' lists subject '{}' twice", class.name, s.name),
                ));
            }
        }

        if let Some(head) = &class.head_teacher {
            if !teacher_ids.contains(head.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownReference,
                    format!(
                        "class '{}' references unknown head teacher '{}'",
                        class.name, head
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
