//! Per-subject scheduling failures.

use serde::Serialize;

/// Most likely reason an hour could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// No teacher qualifies, or none is available at any allowed slot.
    NoTeacher,
    /// No classroom fits the subject and class size, or none is available
    /// at any allowed slot.
    NoClassroom,
    /// No period of the layout falls in a day part the subject allows.
    NoSlot,
    /// Resources exist but every combination clashed or was rejected.
    SlotConflict,
    /// The schedule refused an entry the search had accepted.
    Rejected,
}

impl IssueKind {
    /// Short human-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            IssueKind::NoTeacher => "no suitable teacher",
            IssueKind::NoClassroom => "no suitable classroom",
            IssueKind::NoSlot => "no period in an allowed day part",
            IssueKind::SlotConflict => "time slot conflict",
            IssueKind::Rejected => "entry rejected by the schedule",
        }
    }
}

/// One unplaced hour of a class's subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulingIssue {
    pub class: String,
    pub subject: String,
    /// Which hour of the weekly quota (1-based).
    pub hour: u32,
    /// Weekly quota of the subject.
    pub weekly_hours: u32,
    pub kind: IssueKind,
}

impl std::fmt::Display for SchedulingIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot schedule {} for {} (hour {} of {}): {}",
            self.subject,
            self.class,
            self.hour,
            self.weekly_hours,
            self.kind.reason()
        )
    }
}

impl std::error::Error for SchedulingIssue {}
