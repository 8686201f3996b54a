//! Period layout and schedule configuration.
//!
//! A school day is split into up to three day-parts, each a run of
//! equal-length periods separated by breaks. Periods are numbered
//! continuously across the day: with 4 morning and 4 afternoon periods,
//! period 5 is the first afternoon period.
//!
//! # Period-to-time derivation
//! For a period that is the `k`-th (1-based) of its day-part:
//! `start = part_start + (k - 1) * (class + break)`, `end = start + class`.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use super::time_slot::clock;
use super::{DayPart, TimeSlot, WeekDay};

/// Failure deriving clock times from a period number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimetableError {
    /// Period number outside `1..=total_periods`.
    InvalidPeriod(u32),
    /// Period falls in the evening but no evening start is configured.
    MissingEveningStart(u32),
    /// Derived time runs past midnight.
    TimeOverflow(u32),
}

impl std::fmt::Display for TimetableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimetableError::InvalidPeriod(p) => write!(f, "invalid period number: {p}"),
            TimetableError::MissingEveningStart(p) => {
                write!(f, "period {p} is in the evening but no evening start is configured")
            }
            TimetableError::TimeOverflow(p) => write!(f, "period {p} runs past midnight"),
        }
    }
}

impl std::error::Error for TimetableError {}

/// Daily period layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTable {
    /// Length of one class period (minutes).
    pub class_duration: u32,
    /// Break between consecutive periods (minutes).
    pub break_duration: u32,
    /// First morning period start.
    #[serde(with = "clock")]
    pub morning_start: NaiveTime,
    /// First afternoon period start.
    #[serde(with = "clock")]
    pub afternoon_start: NaiveTime,
    /// First evening period start, if evenings are taught.
    #[serde(default, with = "clock::option")]
    pub evening_start: Option<NaiveTime>,
    #[serde(default = "default_periods")]
    pub periods_per_morning: u32,
    #[serde(default = "default_periods")]
    pub periods_per_afternoon: u32,
    #[serde(default)]
    pub periods_per_evening: u32,
}

fn default_periods() -> u32 {
    4
}

impl Default for TimeTable {
    fn default() -> Self {
        Self {
            class_duration: 45,
            break_duration: 10,
            morning_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            afternoon_start: NaiveTime::from_hms_opt(14, 0, 0).unwrap_or_default(),
            evening_start: None,
            periods_per_morning: 4,
            periods_per_afternoon: 4,
            periods_per_evening: 0,
        }
    }
}

impl TimeTable {
    /// Creates a layout with the given durations and default starts
    /// (08:00 / 14:00, 4 + 4 periods, no evening).
    pub fn new(class_duration: u32, break_duration: u32) -> Self {
        Self {
            class_duration,
            break_duration,
            ..Self::default()
        }
    }

    /// Sets the morning and afternoon start times.
    pub fn with_starts(mut self, morning: NaiveTime, afternoon: NaiveTime) -> Self {
        self.morning_start = morning;
        self.afternoon_start = afternoon;
        self
    }

    /// Sets the evening start time.
    pub fn with_evening_start(mut self, evening: NaiveTime) -> Self {
        self.evening_start = Some(evening);
        self
    }

    /// Sets the period counts per day-part.
    pub fn with_periods(mut self, morning: u32, afternoon: u32, evening: u32) -> Self {
        self.periods_per_morning = morning;
        self.periods_per_afternoon = afternoon;
        self.periods_per_evening = evening;
        self
    }

    /// Total periods in one day, or `None` if the counts do not fit a `u32`.
    pub fn checked_total_periods(&self) -> Option<u32> {
        self.periods_per_morning
            .checked_add(self.periods_per_afternoon)?
            .checked_add(self.periods_per_evening)
    }

    /// Total periods in one day, saturating at `u32::MAX`.
    #[inline]
    pub fn total_periods(&self) -> u32 {
        self.periods_per_morning
            .saturating_add(self.periods_per_afternoon)
            .saturating_add(self.periods_per_evening)
    }

    /// Whether `period` is in `1..=total_periods`.
    #[inline]
    pub fn is_valid_period(&self, period: u32) -> bool {
        period >= 1 && period <= self.total_periods()
    }

    /// Day-part containing `period`.
    pub fn day_part(&self, period: u32) -> Result<DayPart, TimetableError> {
        if !self.is_valid_period(period) {
            return Err(TimetableError::InvalidPeriod(period));
        }
        Ok(if period <= self.periods_per_morning {
            DayPart::Morning
        } else if period <= self.periods_per_morning.saturating_add(self.periods_per_afternoon) {
            DayPart::Afternoon
        } else {
            DayPart::Evening
        })
    }

    /// Start and end clock time of `period`.
    pub fn period_time(&self, period: u32) -> Result<(NaiveTime, NaiveTime), TimetableError> {
        let (base, local) = match self.day_part(period)? {
            DayPart::Morning => (self.morning_start, period),
            DayPart::Afternoon => (self.afternoon_start, period - self.periods_per_morning),
            DayPart::Evening => {
                let base = self
                    .evening_start
                    .ok_or(TimetableError::MissingEveningStart(period))?;
                (
                    base,
                    period - self.periods_per_morning - self.periods_per_afternoon,
                )
            }
        };

        let overflow = TimetableError::TimeOverflow(period);
        let step = i64::from(self.class_duration) + i64::from(self.break_duration);
        let offset = i64::from(local - 1).checked_mul(step).ok_or(overflow)?;
        let start = add_minutes(base, offset).ok_or(overflow)?;
        let end = offset
            .checked_add(i64::from(self.class_duration))
            .and_then(|m| add_minutes(base, m))
            .ok_or(overflow)?;
        Ok((start, end))
    }

    /// `(period, start, end)` for every period of the day.
    pub fn all_periods(&self) -> Result<Vec<(u32, NaiveTime, NaiveTime)>, TimetableError> {
        (1..=self.total_periods())
            .map(|p| self.period_time(p).map(|(s, e)| (p, s, e)))
            .collect()
    }

    /// Builds the time slot for `period` on `weekday`.
    pub fn slot(&self, weekday: WeekDay, period: u32) -> Result<TimeSlot, TimetableError> {
        let (start, end) = self.period_time(period)?;
        Ok(TimeSlot::new(weekday, start, end, period, self.day_part(period)?))
    }
}

const MINUTES_PER_DAY: i64 = 24 * 60;

fn add_minutes(base: NaiveTime, minutes: i64) -> Option<NaiveTime> {
    if !(0..=MINUTES_PER_DAY).contains(&minutes) {
        return None;
    }
    let (time, wrapped) = base.overflowing_add_signed(Duration::minutes(minutes));
    (wrapped == 0).then_some(time)
}

/// Configuration a schedule is generated under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Configuration name.
    #[serde(default)]
    pub name: String,
    /// Teaching days in use.
    pub weekdays: Vec<WeekDay>,
    /// Daily period layout.
    pub timetable: TimeTable,
    /// Whether a class may be split across rooms. Recorded, not enforced.
    #[serde(default)]
    pub allow_split_class: bool,
    /// Whether classes of different grades may share a session. Recorded, not enforced.
    #[serde(default)]
    pub allow_mixed_grade: bool,
    /// Longest run of adjacent periods of one subject a class may have.
    #[serde(default = "default_max_consecutive")]
    pub max_consecutive_same_subject: u32,
    /// Minimum gap between sessions of one subject. Recorded, not enforced;
    /// register a custom rule to act on it.
    #[serde(default = "default_min_interval")]
    pub min_subject_interval: u32,
    /// Independent search attempts per session before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_consecutive() -> u32 {
    2
}

fn default_min_interval() -> u32 {
    1
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            name: "default".into(),
            weekdays: WeekDay::WORKDAYS.to_vec(),
            timetable: TimeTable::default(),
            allow_split_class: false,
            allow_mixed_grade: false,
            max_consecutive_same_subject: default_max_consecutive(),
            min_subject_interval: default_min_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ScheduleConfig {
    /// Creates a configuration over the given weekdays and layout.
    pub fn new(weekdays: Vec<WeekDay>, timetable: TimeTable) -> Self {
        Self {
            weekdays,
            timetable,
            ..Self::default()
        }
    }

    /// Sets the configuration name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the consecutive-same-subject limit.
    pub fn with_max_consecutive(mut self, max: u32) -> Self {
        self.max_consecutive_same_subject = max;
        self
    }

    /// Sets the search attempt budget.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Number of (weekday, period) cells in one week.
    pub fn weekly_slot_count(&self) -> usize {
        self.weekdays.len() * self.timetable.total_periods() as usize
    }
}
