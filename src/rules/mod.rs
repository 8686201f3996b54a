//! Constraint rules and the rule set that evaluates them.
//!
//! A [`Rule`] inspects one candidate entry against the schedule built so far
//! and reports pass or fail with a message. A [`RuleSet`] evaluates its
//! enabled rules in priority order: mandatory rules first, failing fast on
//! the first mandatory violation; softer rules all run and accumulate
//! messages.
//!
//! # Usage
//!
//! ```
//! use timetable_engine::rules::{RuleSet, builtin};
//!
//! let mut rules = RuleSet::standard(2);
//! rules.register(builtin::TeacherDailyLoadRule);
//! assert_eq!(rules.len(), 4);
//! ```

pub mod builtin;
mod set;

pub use set::{RuleSet, RuleSummary, Validation};

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::models::{Schedule, ScheduleEntry};

/// Domain a rule constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Subject,
    Teacher,
    Classroom,
    General,
}

/// Severity tier. Variants are ordered most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePriority {
    /// Violation rejects the candidate and stops evaluation.
    Mandatory,
    High,
    #[serde(alias = "normal")]
    Medium,
    Low,
}

/// Result of one rule check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub passed: bool,
    pub message: String,
}

impl RuleOutcome {
    /// A passing outcome.
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// A failing outcome with a message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Passes when `ok`, otherwise fails with the lazily built message.
    pub fn check(ok: bool, message: impl FnOnce() -> String) -> Self {
        if ok {
            Self::pass()
        } else {
            Self::fail(message())
        }
    }
}

/// A constraint evaluated against a candidate entry.
///
/// Rules must be pure: the same schedule state and candidate always give the
/// same outcome. The rule set caches outcomes on that assumption.
pub trait Rule: Send + Sync + Debug {
    /// Rule name, unique within a rule set.
    fn name(&self) -> &str;

    /// Domain the rule constrains.
    fn category(&self) -> RuleCategory;

    /// Severity tier.
    fn priority(&self) -> RulePriority;

    /// Checks `entry` against the schedule built so far.
    fn check(&self, schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> RuleOutcome;

    /// Rule description.
    fn description(&self) -> &str {
        self.name()
    }
}
