//! Per-run search statistics.

use std::time::Duration;

/// Counters collected during one generation run.
///
/// Returned with every [`Generation`](super::Generation); nothing is kept
/// between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Search attempts started (each reshuffles the slot order).
    pub attempts: u64,
    /// Weekday/period cells visited.
    pub slots_examined: u64,
    /// Cells skipped because the subject may not use that day part.
    pub day_part_skips: u64,
    /// Teacher/classroom pairs turned into candidate entries.
    pub candidates_examined: u64,
    /// Teachers skipped for falling outside their declared windows.
    pub teacher_unavailable: u64,
    /// Classrooms skipped for falling outside their declared windows.
    pub classroom_unavailable: u64,
    /// Candidates that would double-book a class, teacher or classroom.
    pub conflicts: u64,
    /// Candidates turned down by the rule set.
    pub rule_rejections: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Entries committed to the schedule.
    pub committed: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl SearchStats {
    /// Fraction of rule lookups answered from the cache (0.0..1.0).
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Attempts: {}", self.attempts)?;
        writeln!(f, "  Slots Examined: {}", self.slots_examined)?;
        writeln!(f, "  Day-Part Skips: {}", self.day_part_skips)?;
        writeln!(f, "  Candidates Examined: {}", self.candidates_examined)?;
        writeln!(
            f,
            "  Unavailable (teacher/classroom): {}/{}",
            self.teacher_unavailable, self.classroom_unavailable
        )?;
        writeln!(f, "  Conflicts: {}", self.conflicts)?;
        writeln!(f, "  Rule Rejections: {}", self.rule_rejections)?;
        writeln!(
            f,
            "  Rule Cache (hits/misses): {}/{}",
            self.cache_hits, self.cache_misses
        )?;
        writeln!(f, "  Committed: {}", self.committed)?;
        writeln!(f, "  Elapsed (secs): {:.3}", self.elapsed.as_secs_f64())
    }
}
