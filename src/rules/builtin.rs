//! Built-in timetabling rules.
//!
//! # Categories
//!
//! - **Teacher**: availability, daily load, subject preference
//! - **Classroom**: capacity, suitability, availability
//! - **Subject**: consecutive-period limit, day-part, daily limit,
//!   conflicting neighbours
//!
//! [`RuleSet::standard`](super::RuleSet::standard) registers the first rule of
//! each of the three main concerns; the rest are opt-in through
//! [`RuleSet::extended`](super::RuleSet::extended).

use super::{Rule, RuleCategory, RuleOutcome, RulePriority};
use crate::models::{PreferenceTier, Schedule, ScheduleEntry};

// ======================== Teacher rules ========================

/// The teacher is free at the candidate period and inside a declared window.
#[derive(Debug, Clone, Copy)]
pub struct TeacherAvailabilityRule;

impl Rule for TeacherAvailabilityRule {
    fn name(&self) -> &str {
        "teacher availability"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Teacher
    }

    fn priority(&self) -> RulePriority {
        RulePriority::Mandatory
    }

    fn check(&self, schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> RuleOutcome {
        let busy = schedule
            .entries_for_teacher(&entry.teacher.id)
            .any(|e| e.same_period(entry));
        if busy {
            return RuleOutcome::fail(format!(
                "teacher '{}' already teaches at this time",
                entry.teacher.name
            ));
        }
        RuleOutcome::check(entry.teacher.is_available_at(&entry.time_slot), || {
            format!("teacher '{}' is not available at this time", entry.teacher.name)
        })
    }
}

/// The teacher stays within `max_hours_per_day`.
#[derive(Debug, Clone, Copy)]
pub struct TeacherDailyLoadRule;

impl Rule for TeacherDailyLoadRule {
    fn name(&self) -> &str {
        "teacher daily load"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Teacher
    }

    fn priority(&self) -> RulePriority {
        RulePriority::Medium
    }

    fn check(&self, schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> RuleOutcome {
        let load = entry
            .teacher
            .daily_workload(schedule, entry.time_slot.weekday);
        RuleOutcome::check(load < entry.teacher.max_hours_per_day as usize, || {
            format!(
                "teacher '{}' already has {} periods on {}",
                entry.teacher.name, load, entry.time_slot.weekday
            )
        })
    }
}

/// The teacher has not marked the subject as disabled.
#[derive(Debug, Clone, Copy)]
pub struct TeacherPreferenceRule;

impl Rule for TeacherPreferenceRule {
    fn name(&self) -> &str {
        "teacher preference"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Teacher
    }

    fn priority(&self) -> RulePriority {
        RulePriority::Low
    }

    fn check(&self, _schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> RuleOutcome {
        let disabled =
            entry.teacher.preference(&entry.subject.name) == Some(PreferenceTier::Disabled);
        RuleOutcome::check(!disabled, || {
            format!(
                "teacher '{}' has opted out of '{}'",
                entry.teacher.name, entry.subject.name
            )
        })
    }
}

// ======================== Classroom rules ========================

/// The classroom seats the whole class.
#[derive(Debug, Clone, Copy)]
pub struct ClassroomCapacityRule;

impl Rule for ClassroomCapacityRule {
    fn name(&self) -> &str {
        "classroom capacity"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Classroom
    }

    fn priority(&self) -> RulePriority {
        RulePriority::Mandatory
    }

    fn check(&self, _schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> RuleOutcome {
        RuleOutcome::check(entry.classroom.capacity >= entry.class.student_count, || {
            format!(
                "classroom '{}' seats {} but class '{}' has {} students",
                entry.classroom.name,
                entry.classroom.capacity,
                entry.class.name,
                entry.class.student_count
            )
        })
    }
}

/// The classroom type or equipment fits the subject.
#[derive(Debug, Clone, Copy)]
pub struct ClassroomSuitabilityRule;

impl Rule for ClassroomSuitabilityRule {
    fn name(&self) -> &str {
        "classroom suitability"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Classroom
    }

    fn priority(&self) -> RulePriority {
        RulePriority::Mandatory
    }

    fn check(&self, _schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> RuleOutcome {
        RuleOutcome::check(entry.classroom.is_suitable_for(entry.subject), || {
            format!(
                "classroom '{}' is not suitable for '{}'",
                entry.classroom.name, entry.subject.name
            )
        })
    }
}

/// The classroom is free at the candidate period and inside a declared window.
#[derive(Debug, Clone, Copy)]
pub struct ClassroomAvailabilityRule;

impl Rule for ClassroomAvailabilityRule {
    fn name(&self) -> &str {
        "classroom availability"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Classroom
    }

    fn priority(&self) -> RulePriority {
        RulePriority::Mandatory
    }

    fn check(&self, schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> RuleOutcome {
        let busy = schedule
            .entries_for_classroom(&entry.classroom.id)
            .any(|e| e.same_period(entry));
        if busy {
            return RuleOutcome::fail(format!(
                "classroom '{}' is already in use at this time",
                entry.classroom.name
            ));
        }
        RuleOutcome::check(entry.classroom.is_available_at(&entry.time_slot), || {
            format!("classroom '{}' is not available at this time", entry.classroom.name)
        })
    }
}

// ======================== Subject rules ========================

/// Caps the run of adjacent periods a class spends on one subject in a day.
///
/// The run is counted per class: another class taking the same subject in
/// the neighbouring period does not extend it.
#[derive(Debug, Clone, Copy)]
pub struct SubjectConsecutiveRule {
    max_consecutive: u32,
}

impl SubjectConsecutiveRule {
    /// Creates the rule with the given run limit.
    pub fn new(max_consecutive: u32) -> Self {
        Self { max_consecutive }
    }

    /// Configured run limit.
    pub fn max_consecutive(&self) -> u32 {
        self.max_consecutive
    }
}

impl Default for SubjectConsecutiveRule {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Rule for SubjectConsecutiveRule {
    fn name(&self) -> &str {
        "subject consecutive limit"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Subject
    }

    fn priority(&self) -> RulePriority {
        RulePriority::High
    }

    fn check(&self, schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> RuleOutcome {
        let weekday = entry.time_slot.weekday;
        let periods: Vec<u32> = schedule
            .entries_for_class_subject(&entry.class.name, &entry.subject.name)
            .filter(|e| e.time_slot.weekday == weekday)
            .map(|e| e.time_slot.period)
            .collect();

        // Length of the run the candidate would join, walking outwards
        let period = entry.time_slot.period;
        let below = (1..period)
            .rev()
            .take_while(|p| periods.contains(p))
            .count();
        let above = (period + 1..)
            .take_while(|p| periods.contains(p))
            .count();
        let run = 1 + below + above;

        RuleOutcome::check(run <= self.max_consecutive as usize, || {
            format!(
                "'{}' would run {} periods in a row on {} (limit {})",
                entry.subject.name, run, weekday, self.max_consecutive
            )
        })
    }
}

/// The slot's day-part is allowed for the subject.
#[derive(Debug, Clone, Copy)]
pub struct SubjectDayPartRule;

impl Rule for SubjectDayPartRule {
    fn name(&self) -> &str {
        "subject day part"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Subject
    }

    fn priority(&self) -> RulePriority {
        RulePriority::High
    }

    fn check(&self, _schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> RuleOutcome {
        RuleOutcome::check(entry.subject.can_be_scheduled_at(&entry.time_slot), || {
            format!(
                "'{}' is not allowed in the {:?}",
                entry.subject.name, entry.time_slot.day_part
            )
        })
    }
}

/// A class gets at most `max_periods_per_day` periods of a subject per day.
#[derive(Debug, Clone, Copy)]
pub struct SubjectDailyLimitRule;

impl Rule for SubjectDailyLimitRule {
    fn name(&self) -> &str {
        "subject daily limit"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Subject
    }

    fn priority(&self) -> RulePriority {
        RulePriority::Medium
    }

    fn check(&self, schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> RuleOutcome {
        let today = schedule
            .entries_for_class_subject(&entry.class.name, &entry.subject.name)
            .filter(|e| e.time_slot.weekday == entry.time_slot.weekday)
            .count();
        RuleOutcome::check(today < entry.subject.max_periods_per_day as usize, || {
            format!(
                "'{}' already has {} periods on {} (limit {})",
                entry.subject.name,
                today,
                entry.time_slot.weekday,
                entry.subject.max_periods_per_day
            )
        })
    }
}

/// Mutually conflicting subjects are never adjacent for the same class.
#[derive(Debug, Clone, Copy)]
pub struct ConflictingSubjectsRule;

impl Rule for ConflictingSubjectsRule {
    fn name(&self) -> &str {
        "conflicting subjects"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Subject
    }

    fn priority(&self) -> RulePriority {
        RulePriority::Low
    }

    fn check(&self, schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> RuleOutcome {
        let neighbour = schedule.entries_for_class(&entry.class.name).find(|e| {
            e.time_slot.is_consecutive_with(&entry.time_slot)
                && e.subject.conflicts_with(entry.subject)
        });
        match neighbour {
            Some(e) => RuleOutcome::fail(format!(
                "'{}' must not be next to '{}'",
                entry.subject.name, e.subject.name
            )),
            None => RuleOutcome::pass(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Class, Classroom, DayPart, ScheduleConfig, Subject, Teacher, TimeTable, WeekDay,
    };

    struct World {
        class: Class,
        other_class: Class,
        math: Subject,
        pe: Subject,
        music: Subject,
        teacher: Teacher,
        other_teacher: Teacher,
        room: Classroom,
        other_room: Classroom,
        table: TimeTable,
    }

    fn world() -> World {
        World {
            class: Class::new("7", "7A", 30),
            other_class: Class::new("7", "7B", 30),
            math: Subject::new("Math", 5),
            pe: Subject::new("PE", 2)
                .with_conflict("Music")
                .with_day_parts([DayPart::Afternoon]),
            music: Subject::new("Music", 1),
            teacher: Teacher::new("T1", "Ms. Li")
                .with_subject("Math")
                .with_max_hours_per_day(2),
            other_teacher: Teacher::new("T2", "Mr. Wu").with_subject("Math"),
            room: Classroom::new("R1", "Room 101", 35),
            other_room: Classroom::new("R2", "Room 102", 35),
            table: TimeTable::default(),
        }
    }

    impl World {
        fn entry<'a>(
            &'a self,
            class: &'a Class,
            subject: &'a Subject,
            teacher: &'a Teacher,
            room: &'a Classroom,
            day: WeekDay,
            period: u32,
        ) -> ScheduleEntry<'a> {
            ScheduleEntry::new(class, subject, teacher, room, self.table.slot(day, period).unwrap())
        }
    }

    fn empty<'a>() -> Schedule<'a> {
        Schedule::new(ScheduleConfig::default())
    }

    #[test]
    fn test_teacher_double_booking() {
        let w = world();
        let mut s = empty();
        assert!(s.add(w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Monday, 1)));

        let clash = w.entry(&w.other_class, &w.math, &w.teacher, &w.other_room, WeekDay::Monday, 1);
        let outcome = TeacherAvailabilityRule.check(&s, &clash);
        assert!(!outcome.passed);
        assert!(outcome.message.contains("already teaches"));

        let free = w.entry(&w.other_class, &w.math, &w.teacher, &w.other_room, WeekDay::Monday, 2);
        assert!(TeacherAvailabilityRule.check(&s, &free).passed);
    }

    #[test]
    fn test_teacher_window() {
        let w = world();
        let limited = w
            .teacher
            .clone()
            .with_available_time(w.table.slot(WeekDay::Tuesday, 3).unwrap());
        let s = empty();
        let outside = w.entry(&w.class, &w.math, &limited, &w.room, WeekDay::Monday, 3);
        let inside = w.entry(&w.class, &w.math, &limited, &w.room, WeekDay::Tuesday, 3);
        assert!(!TeacherAvailabilityRule.check(&s, &outside).passed);
        assert!(TeacherAvailabilityRule.check(&s, &inside).passed);
    }

    #[test]
    fn test_classroom_capacity() {
        let w = world();
        let small = Classroom::new("R9", "Closet", 20);
        let s = empty();
        let too_small = w.entry(&w.class, &w.math, &w.teacher, &small, WeekDay::Monday, 1);
        let outcome = ClassroomCapacityRule.check(&s, &too_small);
        assert!(!outcome.passed);
        assert!(outcome.message.contains("Closet"));

        let fits = w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Monday, 1);
        assert!(ClassroomCapacityRule.check(&s, &fits).passed);
    }

    #[test]
    fn test_consecutive_run_limit() {
        let w = world();
        let rule = SubjectConsecutiveRule::new(2);
        let mut s = empty();
        assert!(s.add(w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Monday, 1)));
        assert!(s.add(w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Monday, 2)));

        // Period 3 would make a run of three
        let third = w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Monday, 3);
        assert!(!rule.check(&s, &third).passed);

        // Period 4 is separated by a gap
        let gap = w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Monday, 4);
        assert!(rule.check(&s, &gap).passed);

        // Another day is unaffected
        let tuesday = w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Tuesday, 3);
        assert!(rule.check(&s, &tuesday).passed);

        // Another class is unaffected
        let other = w.entry(
            &w.other_class,
            &w.math,
            &w.other_teacher,
            &w.other_room,
            WeekDay::Monday,
            3,
        );
        assert!(rule.check(&s, &other).passed);
    }

    #[test]
    fn test_consecutive_bridging_two_runs() {
        let w = world();
        let rule = SubjectConsecutiveRule::new(3);
        let mut s = empty();
        for p in [1, 2, 4, 5] {
            assert!(s.add(w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Monday, p)));
        }
        // Filling period 3 joins 1-2 and 4-5 into a run of five
        let bridge = w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Monday, 3);
        let outcome = rule.check(&s, &bridge);
        assert!(!outcome.passed);
        assert!(outcome.message.contains("5 periods"));
    }

    #[test]
    fn test_day_part_rule() {
        let w = world();
        let s = empty();
        let morning = w.entry(&w.class, &w.pe, &w.teacher, &w.room, WeekDay::Monday, 1);
        let afternoon = w.entry(&w.class, &w.pe, &w.teacher, &w.room, WeekDay::Monday, 5);
        assert!(!SubjectDayPartRule.check(&s, &morning).passed);
        assert!(SubjectDayPartRule.check(&s, &afternoon).passed);
    }

    #[test]
    fn test_daily_limit_and_teacher_load() {
        let w = world();
        let mut s = empty();
        assert!(s.add(w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Monday, 1)));
        assert!(s.add(w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Monday, 5)));

        let third = w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Monday, 7);
        assert!(!SubjectDailyLimitRule.check(&s, &third).passed);
        // Teacher capped at 2 per day
        let elsewhere = w.entry(
            &w.other_class,
            &w.math,
            &w.teacher,
            &w.other_room,
            WeekDay::Monday,
            7,
        );
        assert!(!TeacherDailyLoadRule.check(&s, &elsewhere).passed);
        let next_day = w.entry(
            &w.other_class,
            &w.math,
            &w.teacher,
            &w.other_room,
            WeekDay::Tuesday,
            1,
        );
        assert!(TeacherDailyLoadRule.check(&s, &next_day).passed);
    }

    #[test]
    fn test_preference_rule() {
        let w = world();
        let reluctant = w
            .other_teacher
            .clone()
            .with_preference("Math", PreferenceTier::Disabled);
        let s = empty();
        let e = w.entry(&w.class, &w.math, &reluctant, &w.room, WeekDay::Monday, 1);
        assert!(!TeacherPreferenceRule.check(&s, &e).passed);
        let e = w.entry(&w.class, &w.math, &w.other_teacher, &w.room, WeekDay::Monday, 1);
        assert!(TeacherPreferenceRule.check(&s, &e).passed);
    }

    #[test]
    fn test_classroom_rules() {
        let w = world();
        let chem = Subject::new("Chemistry", 2).with_room_type("lab");
        let mut s = empty();
        let e = w.entry(&w.class, &chem, &w.teacher, &w.room, WeekDay::Monday, 1);
        assert!(!ClassroomSuitabilityRule.check(&s, &e).passed);

        assert!(s.add(w.entry(&w.class, &w.math, &w.teacher, &w.room, WeekDay::Monday, 2)));
        let busy = w.entry(&w.other_class, &w.math, &w.other_teacher, &w.room, WeekDay::Monday, 2);
        assert!(!ClassroomAvailabilityRule.check(&s, &busy).passed);
        let free = w.entry(
            &w.other_class,
            &w.math,
            &w.other_teacher,
            &w.other_room,
            WeekDay::Monday,
            2,
        );
        assert!(ClassroomAvailabilityRule.check(&s, &free).passed);
    }

    #[test]
    fn test_conflicting_neighbours() {
        let w = world();
        let mut s = empty();
        assert!(s.add(w.entry(&w.class, &w.music, &w.teacher, &w.room, WeekDay::Friday, 5)));

        let adjacent = w.entry(&w.class, &w.pe, &w.other_teacher, &w.room, WeekDay::Friday, 6);
        assert!(!ConflictingSubjectsRule.check(&s, &adjacent).passed);
        let apart = w.entry(&w.class, &w.pe, &w.other_teacher, &w.room, WeekDay::Friday, 7);
        assert!(ConflictingSubjectsRule.check(&s, &apart).passed);
        let other_class = w.entry(
            &w.other_class,
            &w.pe,
            &w.other_teacher,
            &w.other_room,
            WeekDay::Friday,
            6,
        );
        assert!(ConflictingSubjectsRule.check(&s, &other_class).passed);
    }
}
