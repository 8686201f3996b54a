//! Service facade: the single "generate a timetable from these inputs" call.
//!
//! Every call builds its own [`AssignmentEngine`], so one service can serve
//! concurrent requests without sharing schedule state, rule caches or
//! random sources between them. Failures never escape as panics or `Err`:
//! they come back in the response's error list.
//!
//! # Example
//!
//! ```
//! use timetable_engine::service::SchedulerService;
//!
//! let request = r#"{
//!     "classes": [{
//!         "name": "7A", "student_count": 30,
//!         "subjects": [{"name": "Math", "weekly_hours": 2, "allowed_day_parts": ["morning"]}]
//!     }],
//!     "teachers": [{"id": "T1", "name": "Ms. Li", "subjects": ["Math"]}],
//!     "classrooms": [{"id": "R1", "name": "Room 101", "capacity": 35}]
//! }"#;
//!
//! let response = SchedulerService::default().with_seed(1).create_schedule_json(request);
//! assert!(response.success);
//! assert_eq!(response.schedule.len(), 2);
//! ```

mod document;
mod record;

pub use document::{DocumentEntry, DocumentError, ScheduleDocument};
pub use record::{format_schedule, EntryRecord, ScheduleRequest, ScheduleResponse, WeekdayStyle};

use log::{info, warn};

use crate::models::{Class, Classroom, ScheduleConfig, Teacher};
use crate::rules::RuleSet;
use crate::scheduler::{AssignmentEngine, TimetableSummary};

/// Timetable generation service.
#[derive(Debug, Clone, Default)]
pub struct SchedulerService {
    config: ScheduleConfig,
    seed: Option<u64>,
    rules: Option<RuleSet>,
    weekday_style: WeekdayStyle,
}

impl SchedulerService {
    /// Creates a service generating under `config`.
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Seeds every run deterministically.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Uses `rules` instead of the standard rule set.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Sets how weekdays are rendered in entry records.
    pub fn with_weekday_style(mut self, style: WeekdayStyle) -> Self {
        self.weekday_style = style;
        self
    }

    /// Default configuration of this service.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Generates a timetable under the service configuration.
    pub fn create_schedule(
        &self,
        classes: &[Class],
        teachers: &[Teacher],
        classrooms: &[Classroom],
    ) -> ScheduleResponse {
        self.run(self.config.clone(), classes, teachers, classrooms)
    }

    /// Parses a [`ScheduleRequest`] document and generates a timetable.
    ///
    /// A document that cannot be parsed yields a single `system error`.
    pub fn create_schedule_json(&self, json: &str) -> ScheduleResponse {
        let request: ScheduleRequest = match serde_json::from_str(json) {
            Ok(r) => r,
            Err(e) => {
                warn!("rejected malformed schedule request: {e}");
                return ScheduleResponse::failure(vec![format!("system error: {e}")]);
            }
        };
        let config = request.config.unwrap_or_else(|| self.config.clone());
        self.run(
            config,
            &request.classes,
            &request.teachers,
            &request.classrooms,
        )
    }

    fn run(
        &self,
        config: ScheduleConfig,
        classes: &[Class],
        teachers: &[Teacher],
        classrooms: &[Classroom],
    ) -> ScheduleResponse {
        let mut engine = match self.seed {
            Some(seed) => AssignmentEngine::with_seed(config, seed),
            None => AssignmentEngine::new(config),
        };
        if let Some(rules) = &self.rules {
            engine = engine.with_rules(rules.clone());
        }

        match engine.generate(classes, teachers, classrooms) {
            Ok(generation) => {
                let summary = TimetableSummary::calculate(&generation.schedule, classes);
                info!(
                    "schedule generated: {}/{} hours ({:.0}%), {} issue(s)",
                    summary.scheduled_hours,
                    summary.required_hours,
                    summary.completion_rate * 100.0,
                    generation.issues.len()
                );
                ScheduleResponse::new(
                    format_schedule(&generation.schedule, self.weekday_style),
                    generation.error_messages(),
                )
            }
            Err(errors) => ScheduleResponse::failure(
                errors
                    .iter()
                    .map(|e| format!("configuration error: {e}"))
                    .collect(),
            ),
        }
    }
}
