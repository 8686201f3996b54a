//! Timetabling domain models.
//!
//! Reference data (classes, subjects, teachers, classrooms) is supplied by the
//! caller and only read during a run. The [`Schedule`] aggregate owns the
//! committed entries and answers every conflict query.
//!
//! # Domain Mappings
//!
//! | timetable-engine | Generic scheduling |
//! |------------------|--------------------|
//! | Class | Job |
//! | Subject | Activity type with a weekly quota |
//! | Teacher / Classroom | Resources |
//! | TimeSlot | Discrete time bucket |
//! | ScheduleEntry | Assignment |

mod class;
mod resource;
mod schedule;
mod subject;
pub(crate) mod time_slot;
mod timetable;

pub use class::Class;
pub use resource::{Classroom, PreferenceTier, Teacher};
pub use schedule::{Schedule, ScheduleEntry};
pub use subject::Subject;
pub use time_slot::{DayPart, TimeSlot, WeekDay};
pub use timetable::{ScheduleConfig, TimeTable, TimetableError};
