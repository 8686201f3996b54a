//! Weekday, day-part and time slot models.
//!
//! A time slot is the unit of schedulable time in a weekly timetable:
//! one numbered period on one weekday, with its wall-clock range and the
//! coarse day segment it falls in.
//!
//! # Time Model
//! Clock times are `chrono::NaiveTime` (no date, no zone). Ranges are
//! treated as closed intervals `[start, end]` when testing overlap, so two
//! slots touching at a boundary minute overlap.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Day of the school week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    /// All seven days, Monday first.
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
        WeekDay::Sunday,
    ];

    /// Monday through Friday.
    pub const WORKDAYS: [WeekDay; 5] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
    ];

    /// Lowercase English label (`"monday"`), matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            WeekDay::Monday => "monday",
            WeekDay::Tuesday => "tuesday",
            WeekDay::Wednesday => "wednesday",
            WeekDay::Thursday => "thursday",
            WeekDay::Friday => "friday",
            WeekDay::Saturday => "saturday",
            WeekDay::Sunday => "sunday",
        }
    }

    /// Localized single-character label used on printed timetables.
    pub fn short_label(&self) -> &'static str {
        match self {
            WeekDay::Monday => "一",
            WeekDay::Tuesday => "二",
            WeekDay::Wednesday => "三",
            WeekDay::Thursday => "四",
            WeekDay::Friday => "五",
            WeekDay::Saturday => "六",
            WeekDay::Sunday => "日",
        }
    }
}

impl std::fmt::Display for WeekDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse segment of a school day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

/// One numbered period on one weekday.
///
/// Equality compares every field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Day of the week.
    pub weekday: WeekDay,
    /// Period start (wall clock).
    #[serde(with = "clock")]
    pub start_time: NaiveTime,
    /// Period end (wall clock).
    #[serde(with = "clock")]
    pub end_time: NaiveTime,
    /// Period number within the day (1-based).
    pub period: u32,
    /// Day segment the period belongs to.
    pub day_part: DayPart,
}

impl TimeSlot {
    /// Creates a new time slot.
    pub fn new(
        weekday: WeekDay,
        start_time: NaiveTime,
        end_time: NaiveTime,
        period: u32,
        day_part: DayPart,
    ) -> Self {
        Self {
            weekday,
            start_time,
            end_time,
            period,
            day_part,
        }
    }

    /// Whether two slots share a weekday and their clock ranges intersect.
    pub fn overlaps_with(&self, other: &Self) -> bool {
        self.weekday == other.weekday
            && self.start_time <= other.end_time
            && self.end_time >= other.start_time
    }

    /// Whether two slots are adjacent periods on the same weekday.
    pub fn is_consecutive_with(&self, other: &Self) -> bool {
        self.weekday == other.weekday && self.period.abs_diff(other.period) == 1
    }

    /// Whether two slots occupy the same weekday and period.
    #[inline]
    pub fn same_period(&self, other: &Self) -> bool {
        self.weekday == other.weekday && self.period == other.period
    }

    /// `"HH:MM-HH:MM"` rendering of the clock range.
    pub fn time_range(&self) -> String {
        format!(
            "{}-{}",
            self.start_time.format(clock::FORMAT),
            self.end_time.format(clock::FORMAT)
        )
    }
}

/// `"HH:MM"` serde adapter for `NaiveTime`.
pub(crate) mod clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) const FORMAT: &str = "%H:%M";

    pub(crate) fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&time.format(FORMAT))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }

    /// Same adapter for optional times.
    pub(crate) mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub(crate) fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(t) => s.collect_str(&t.format(super::FORMAT)),
                None => s.serialize_none(),
            }
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            raw.map(|r| NaiveTime::parse_from_str(&r, super::FORMAT))
                .transpose()
                .map_err(serde::de::Error::custom)
        }
    }
}
