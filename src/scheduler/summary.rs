//! Timetable quality summary.
//!
//! Computes coverage and load indicators from a generated schedule and the
//! classes it was generated for.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Required hours | Sum of weekly quotas over all class subjects |
//! | Scheduled hours | Committed entries |
//! | Completion rate | Scheduled / required |
//! | Teacher weekly load | Entries per teacher |
//! | Teacher peak daily load | Busiest day per teacher |
//! | Classroom utilization | Entries per room / weekly slot grid |

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Class, Schedule};

/// Coverage and load indicators of a schedule.
#[derive(Debug, Clone, Serialize)]
pub struct TimetableSummary {
    pub required_hours: u64,
    pub scheduled_hours: usize,
    /// Fraction of required hours placed (0.0..1.0).
    pub completion_rate: f64,
    /// Weekly periods per teacher id.
    pub teacher_weekly_load: BTreeMap<String, usize>,
    /// Busiest single day per teacher id.
    pub teacher_peak_daily_load: BTreeMap<String, usize>,
    /// Share of the weekly slot grid each classroom id is booked (0.0..1.0).
    pub classroom_utilization: BTreeMap<String, f64>,
    /// Mean over booked classrooms.
    pub avg_classroom_utilization: f64,
}

impl TimetableSummary {
    /// Computes the summary of `schedule` for `classes`.
    pub fn calculate(schedule: &Schedule<'_>, classes: &[Class]) -> Self {
        let required_hours: u64 = classes.iter().map(Class::total_weekly_hours).sum();
        let scheduled_hours = schedule.len();

        let mut teacher_weekly_load: BTreeMap<String, usize> = BTreeMap::new();
        let mut daily: BTreeMap<(String, _), usize> = BTreeMap::new();
        let mut room_bookings: BTreeMap<String, usize> = BTreeMap::new();

        for e in schedule.entries() {
            *teacher_weekly_load.entry(e.teacher.id.clone()).or_default() += 1;
            *daily
                .entry((e.teacher.id.clone(), e.time_slot.weekday))
                .or_default() += 1;
            *room_bookings.entry(e.classroom.id.clone()).or_default() += 1;
        }

        let mut teacher_peak_daily_load: BTreeMap<String, usize> = BTreeMap::new();
        for ((teacher, _), count) in daily {
            let peak = teacher_peak_daily_load.entry(teacher).or_default();
            *peak = (*peak).max(count);
        }

        let grid = schedule.config().weekly_slot_count();
        let classroom_utilization: BTreeMap<String, f64> = room_bookings
            .into_iter()
            .map(|(room, n)| {
                let u = if grid == 0 { 0.0 } else { n as f64 / grid as f64 };
                (room, u)
            })
            .collect();
        let avg_classroom_utilization = if classroom_utilization.is_empty() {
            0.0
        } else {
            classroom_utilization.values().sum::<f64>() / classroom_utilization.len() as f64
        };

        let completion_rate = if required_hours == 0 {
            1.0
        } else {
            scheduled_hours as f64 / required_hours as f64
        };

        Self {
            required_hours,
            scheduled_hours,
            completion_rate,
            teacher_weekly_load,
            teacher_peak_daily_load,
            classroom_utilization,
            avg_classroom_utilization,
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_completion: f64, max_daily_load: usize) -> bool {
        self.completion_rate >= min_completion
            && self
                .teacher_peak_daily_load
                .values()
                .all(|&load| load <= max_daily_load)
    }
}
