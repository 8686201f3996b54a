//! Assignment engine, run statistics and timetable summary.
//!
//! # Algorithm
//!
//! [`AssignmentEngine`] is a randomized, priority-driven, first-fit
//! constructive search with a bounded number of reshuffled attempts per
//! hour. It is not complete: a failed search does not prove infeasibility.
//!
//! # Diagnostics
//!
//! Each run returns its [`SearchStats`] and one [`SchedulingIssue`] per hour
//! it could not place. [`TimetableSummary`] reports coverage and load of a
//! finished schedule.

mod engine;
mod issue;
mod stats;
mod summary;

pub use engine::{AssignmentEngine, Generation};
pub use issue::{IssueKind, SchedulingIssue};
pub use stats::SearchStats;
pub use summary::TimetableSummary;
