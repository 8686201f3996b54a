//! School timetable generation engine.
//!
//! Assigns recurring weekly class sessions to time slots, teachers and
//! classrooms. Hard constraints (no double-booking, room capacity, room
//! suitability) are never violated; softer ones (day parts, consecutive
//! periods, daily loads) are enforced through a pluggable rule set.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Class`, `Subject`, `Teacher`, `Classroom`,
//!   `TimeSlot`, `TimeTable`, `ScheduleConfig`, `Schedule`, `ScheduleEntry`
//! - **`rules`**: `Rule` trait, prioritized `RuleSet` with fail-fast mandatory
//!   evaluation, built-in rules
//! - **`scheduler`**: Randomized first-fit `AssignmentEngine`, per-run
//!   `SearchStats`, `TimetableSummary`
//! - **`validation`**: Configuration and reference-data checks run before
//!   any search
//! - **`service`**: JSON-facing facade, entry records and the persistence
//!   document
//!
//! # Guarantees
//!
//! Generation is best-effort: it always terminates and returns every entry
//! it could place plus one issue per unplaced hour. It is not a complete
//! solver; a reported issue does not prove the timetable infeasible.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

pub mod models;
pub mod rules;
pub mod scheduler;
pub mod service;
pub mod validation;
