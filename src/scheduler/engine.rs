//! Randomized first-fit assignment engine.
//!
//! # Algorithm
//!
//! 1. Validate the configuration and reference data; refuse the run on error.
//! 2. For each class, walk its subjects by descending `(priority, weekly_hours)`.
//! 3. For each required hour, search for a placement:
//!    - pre-filter teachers who teach the subject and rooms that suit it and
//!      seat the class;
//!    - up to `max_attempts` times, shuffle weekdays and periods, skip slots
//!      outside the subject's day parts, shuffle teachers and rooms, and take
//!      the first pair that is available, conflict-free and passes the rules.
//! 4. When an hour cannot be placed, record one issue per missing hour and
//!    move on to the next subject.
//!
//! The run always completes and returns whatever was placed.
//!
//! # Complexity
//! O(h * a * d * p * t * r * n) in the worst case, where h = total hours,
//! a = attempts, d = weekdays, p = periods, t = teachers, r = rooms and
//! n = committed entries (linear conflict scan).

use std::time::Instant;

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{IssueKind, SchedulingIssue, SearchStats};
use crate::models::{
    Class, Classroom, Schedule, ScheduleConfig, ScheduleEntry, Subject, Teacher, TimeSlot,
};
use crate::rules::RuleSet;
use crate::validation::{validate_config, validate_input, ValidationError};

/// Outcome of one generation run.
#[derive(Debug, Clone)]
pub struct Generation<'a> {
    /// Every entry that could be placed.
    pub schedule: Schedule<'a>,
    /// One issue per unplaced hour, in discovery order.
    pub issues: Vec<SchedulingIssue>,
    pub stats: SearchStats,
}

impl Generation<'_> {
    /// Whether every required hour was placed.
    pub fn is_success(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues rendered as messages.
    pub fn error_messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Constructive timetable search.
///
/// Owns its random source and rule set; build one engine per run (or per
/// concurrent request) rather than sharing one across threads.
///
/// # Example
///
/// ```
/// use timetable_engine::models::{Class, Classroom, DayPart, ScheduleConfig, Subject, Teacher};
/// use timetable_engine::scheduler::AssignmentEngine;
///
/// let classes = vec![Class::new("7", "7A", 30)
///     .with_subject(Subject::new("Math", 2).with_day_parts([DayPart::Morning]))];
/// let teachers = vec![Teacher::new("T1", "Ms. Li").with_subject("Math")];
/// let rooms = vec![Classroom::new("R1", "Room 101", 35)];
///
/// let mut engine = AssignmentEngine::with_seed(ScheduleConfig::default(), 42);
/// let result = engine.generate(&classes, &teachers, &rooms).unwrap();
/// assert!(result.is_success());
/// assert_eq!(result.schedule.len(), 2);
/// ```
pub struct AssignmentEngine<R = StdRng> {
    config: ScheduleConfig,
    rules: RuleSet,
    rng: R,
}

impl AssignmentEngine<StdRng> {
    /// Creates an engine seeded from the operating system.
    pub fn new(config: ScheduleConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Creates an engine with a deterministic seed.
    pub fn with_seed(config: ScheduleConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AssignmentEngine<R> {
    /// Creates an engine with the given random source and the standard rules.
    pub fn with_rng(config: ScheduleConfig, rng: R) -> Self {
        let rules = RuleSet::standard(config.max_consecutive_same_subject);
        Self { config, rules, rng }
    }

    /// Replaces the rule set.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Configuration the engine schedules under.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Active rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Mutable access to the rule set, for registering extra rules.
    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    /// Builds a timetable for `classes` from the given teachers and rooms.
    ///
    /// Returns `Err` only when the configuration or reference data is
    /// invalid; search failures are reported as issues on the result.
    pub fn generate<'a>(
        &mut self,
        classes: &'a [Class],
        teachers: &'a [Teacher],
        classrooms: &'a [Classroom],
    ) -> Result<Generation<'a>, Vec<ValidationError>> {
        let mut errors = Vec::new();
        if let Err(e) = validate_config(&self.config) {
            errors.extend(e);
        }
        if let Err(e) = validate_input(classes, teachers, classrooms) {
            errors.extend(e);
        }
        if !errors.is_empty() {
            warn!("generation refused: {} validation error(s)", errors.len());
            return Err(errors);
        }

        let started = Instant::now();
        let (hits_before, misses_before) = (self.rules.cache_hits(), self.rules.cache_misses());
        self.rules.clear_cache();

        info!(
            "generating '{}': {} classes, {} teachers, {} classrooms, {} weekly slots",
            self.config.name,
            classes.len(),
            teachers.len(),
            classrooms.len(),
            self.config.weekly_slot_count()
        );

        let mut schedule = Schedule::new(self.config.clone());
        let mut issues = Vec::new();
        let mut stats = SearchStats::default();

        for class in classes {
            for idx in class.subjects_by_priority() {
                let subject = &class.subjects[idx];
                self.schedule_subject(
                    &mut schedule,
                    class,
                    subject,
                    teachers,
                    classrooms,
                    &mut issues,
                    &mut stats,
                );
            }
        }

        stats.cache_hits = self.rules.cache_hits() - hits_before;
        stats.cache_misses = self.rules.cache_misses() - misses_before;
        stats.elapsed = started.elapsed();

        info!(
            "generation finished: {} entries, {} issue(s) in {:.2?}",
            schedule.len(),
            issues.len(),
            stats.elapsed
        );

        Ok(Generation {
            schedule,
            issues,
            stats,
        })
    }

    /// Places every hour of one subject, or records why it could not.
    #[allow(clippy::too_many_arguments)]
    fn schedule_subject<'a>(
        &mut self,
        schedule: &mut Schedule<'a>,
        class: &'a Class,
        subject: &'a Subject,
        teachers: &'a [Teacher],
        classrooms: &'a [Classroom],
        issues: &mut Vec<SchedulingIssue>,
        stats: &mut SearchStats,
    ) {
        let qualified: Vec<&'a Teacher> = teachers
            .iter()
            .filter(|t| t.can_teach(&subject.name))
            .collect();
        let suitable: Vec<&'a Classroom> = classrooms
            .iter()
            .filter(|r| r.is_suitable_for(subject) && r.capacity >= class.student_count)
            .collect();

        let mut placed = 0;
        while placed < subject.weekly_hours {
            let found = if qualified.is_empty() || suitable.is_empty() {
                None
            } else {
                self.try_schedule(schedule, class, subject, &qualified, &suitable, stats)
            };

            let kind = match found {
                Some(entry) => {
                    trace!(
                        "{} {} -> {} p{} ({}, {})",
                        class.name,
                        subject.name,
                        entry.time_slot.weekday,
                        entry.time_slot.period,
                        entry.teacher.id,
                        entry.classroom.id
                    );
                    if schedule.add(entry) {
                        placed += 1;
                        stats.committed += 1;
                        continue;
                    }
                    IssueKind::Rejected
                }
                None => self.diagnose(subject, &qualified, &suitable),
            };

            debug!(
                "{} {}: {} of {} hours placed, stopping ({})",
                class.name,
                subject.name,
                placed,
                subject.weekly_hours,
                kind.reason()
            );
            issues.extend(
                (placed + 1..=subject.weekly_hours).map(|hour| SchedulingIssue {
                    class: class.name.clone(),
                    subject: subject.name.clone(),
                    hour,
                    weekly_hours: subject.weekly_hours,
                    kind,
                }),
            );
            break;
        }
    }

    /// Searches for one placement. First fit wins.
    fn try_schedule<'a>(
        &mut self,
        schedule: &Schedule<'a>,
        class: &'a Class,
        subject: &'a Subject,
        teachers: &[&'a Teacher],
        classrooms: &[&'a Classroom],
        stats: &mut SearchStats,
    ) -> Option<ScheduleEntry<'a>> {
        let mut weekdays = self.config.weekdays.clone();
        let mut periods: Vec<u32> = (1..=self.config.timetable.total_periods()).collect();
        let mut teachers = teachers.to_vec();
        let mut classrooms = classrooms.to_vec();

        for attempt in 1..=self.config.max_attempts {
            stats.attempts += 1;
            weekdays.shuffle(&mut self.rng);
            periods.shuffle(&mut self.rng);

            for &weekday in &weekdays {
                for &period in &periods {
                    let Ok(slot) = self.config.timetable.slot(weekday, period) else {
                        continue;
                    };
                    stats.slots_examined += 1;
                    if !subject.can_be_scheduled_at(&slot) {
                        stats.day_part_skips += 1;
                        continue;
                    }

                    teachers.shuffle(&mut self.rng);
                    classrooms.shuffle(&mut self.rng);

                    for &teacher in &teachers {
                        if !teacher.is_available_at(&slot) {
                            stats.teacher_unavailable += 1;
                            continue;
                        }
                        for &classroom in &classrooms {
                            if !classroom.is_available_at(&slot) {
                                stats.classroom_unavailable += 1;
                                continue;
                            }
                            stats.candidates_examined += 1;

                            let candidate = ScheduleEntry::new(
                                class,
                                subject,
                                teacher,
                                classroom,
                                slot.clone(),
                            );
                            if schedule.has_conflict(&candidate) {
                                stats.conflicts += 1;
                                continue;
                            }
                            if !self.rules.validate(schedule, &candidate).valid {
                                stats.rule_rejections += 1;
                                continue;
                            }
                            return Some(candidate);
                        }
                    }
                }
            }

            debug!(
                "{} {}: attempt {}/{} exhausted",
                class.name, subject.name, attempt, self.config.max_attempts
            );
        }
        None
    }

    /// Most likely cause of a failed search, from static data only.
    fn diagnose(
        &self,
        subject: &Subject,
        teachers: &[&Teacher],
        classrooms: &[&Classroom],
    ) -> IssueKind {
        if teachers.is_empty() {
            return IssueKind::NoTeacher;
        }
        if classrooms.is_empty() {
            return IssueKind::NoClassroom;
        }

        let allowed: Vec<TimeSlot> = self
            .config
            .weekdays
            .iter()
            .flat_map(|&day| {
                (1..=self.config.timetable.total_periods())
                    .filter_map(move |p| self.config.timetable.slot(day, p).ok())
            })
            .filter(|slot| subject.can_be_scheduled_at(slot))
            .collect();

        if allowed.is_empty() {
            IssueKind::NoSlot
        } else if !allowed
            .iter()
            .any(|s| teachers.iter().any(|t| t.is_available_at(s)))
        {
            IssueKind::NoTeacher
        } else if !allowed
            .iter()
            .any(|s| classrooms.iter().any(|r| r.is_available_at(s)))
        {
            IssueKind::NoClassroom
        } else {
            IssueKind::SlotConflict
        }
    }
}

impl<R> std::fmt::Debug for AssignmentEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssignmentEngine")
            .field("config", &self.config.name)
            .field("weekdays", &self.config.weekdays)
            .field("max_attempts", &self.config.max_attempts)
            .field("rules", &self.rules)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayPart, TimeTable, WeekDay};
    use crate::rules::builtin::SubjectDailyLimitRule;
    use crate::validation::ValidationErrorKind;

    fn one_class(subject: Subject) -> Vec<Class> {
        vec![Class::new("7", "7A", 30).with_subject(subject)]
    }

    fn math_teacher() -> Vec<Teacher> {
        vec![Teacher::new("T1", "Ms. Li").with_subject("Math")]
    }

    fn room(capacity: u32) -> Vec<Classroom> {
        vec![Classroom::new("R1", "Room 101", capacity)]
    }

    #[test]
    fn test_single_subject_morning_only() {
        let classes = one_class(Subject::new("Math", 2).with_day_parts([DayPart::Morning]));
        let teachers = math_teacher();
        let rooms = room(35);

        let mut engine = AssignmentEngine::with_seed(ScheduleConfig::default(), 7);
        let result = engine.generate(&classes, &teachers, &rooms).unwrap();

        assert!(result.is_success());
        assert_eq!(result.schedule.len(), 2);
        for e in result.schedule.entries() {
            assert_eq!(e.time_slot.day_part, DayPart::Morning);
            assert!(e.time_slot.period <= 4);
        }
        assert_eq!(result.stats.committed, 2);
    }

    #[test]
    fn test_capacity_short_circuit() {
        let classes = one_class(Subject::new("Math", 2));
        let teachers = math_teacher();
        let rooms = room(20);

        let mut engine = AssignmentEngine::with_seed(ScheduleConfig::default(), 7);
        let result = engine.generate(&classes, &teachers, &rooms).unwrap();

        assert!(!result.is_success());
        assert!(result.schedule.is_empty());
        assert_eq!(result.issues.len(), 2);
        assert!(result.issues.iter().all(|i| i.kind == IssueKind::NoClassroom));
        // No search was attempted
        assert_eq!(result.stats.attempts, 0);
    }

    #[test]
    fn test_no_teacher() {
        let classes = one_class(Subject::new("Art", 1));
        let mut engine = AssignmentEngine::with_seed(ScheduleConfig::default(), 1);
        let teachers = math_teacher();
        let rooms = room(40);
        let result = engine.generate(&classes, &teachers, &rooms).unwrap();
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].kind, IssueKind::NoTeacher);
        assert!(result.error_messages()[0].contains("teacher"));
    }

    #[test]
    fn test_no_slot_in_allowed_day_part() {
        let classes = one_class(Subject::new("Math", 1).with_day_parts([DayPart::Evening]));
        let mut engine = AssignmentEngine::with_seed(ScheduleConfig::default(), 1);
        let teachers = math_teacher();
        let rooms = room(40);
        let result = engine.generate(&classes, &teachers, &rooms).unwrap();
        assert_eq!(result.issues[0].kind, IssueKind::NoSlot);
        assert_eq!(result.stats.attempts, 3);
        assert_eq!(result.stats.candidates_examined, 0);
    }

    #[test]
    fn test_quota_exceeds_grid() {
        // 1 day x 2 periods, 3 hours wanted
        let config = ScheduleConfig::new(
            vec![WeekDay::Monday],
            TimeTable::default().with_periods(2, 0, 0),
        )
        .with_max_consecutive(5);
        let classes = one_class(Subject::new("Math", 3));
        let teachers = math_teacher();
        let rooms = room(40);

        let mut engine = AssignmentEngine::with_seed(config, 3);
        let result = engine.generate(&classes, &teachers, &rooms).unwrap();

        assert_eq!(result.schedule.len(), 2);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].hour, 3);
        assert_eq!(result.issues[0].kind, IssueKind::SlotConflict);
    }

    #[test]
    fn test_priority_order_wins_contended_slot() {
        let config = ScheduleConfig::new(
            vec![WeekDay::Monday],
            TimeTable::default().with_periods(1, 0, 0),
        );
        let classes = vec![Class::new("7", "7A", 30)
            .with_subject(Subject::new("Music", 1))
            .with_subject(Subject::new("Math", 1).with_priority(5))];
        let teachers = vec![Teacher::new("T1", "Ms. Li")
            .with_subject("Math")
            .with_subject("Music")];
        let rooms = room(40);

        let mut engine = AssignmentEngine::with_seed(config, 11);
        let result = engine.generate(&classes, &teachers, &rooms).unwrap();

        assert_eq!(result.schedule.entries()[0].subject.name, "Math");
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].subject, "Music");
    }

    #[test]
    fn test_seed_reproducibility() {
        let classes = vec![
            Class::new("7", "7A", 30)
                .with_subject(Subject::new("Math", 4))
                .with_subject(Subject::new("English", 3)),
            Class::new("7", "7B", 28).with_subject(Subject::new("Math", 4)),
        ];
        let teachers = vec![
            Teacher::new("T1", "Ms. Li").with_subject("Math"),
            Teacher::new("T2", "Mr. Wu")
                .with_subject("Math")
                .with_subject("English"),
        ];
        let rooms = vec![
            Classroom::new("R1", "Room 101", 40),
            Classroom::new("R2", "Room 102", 40),
        ];

        let run = |seed| {
            let mut engine = AssignmentEngine::with_seed(ScheduleConfig::default(), seed);
            let result = engine.generate(&classes, &teachers, &rooms).unwrap();
            result
                .schedule
                .entries()
                .iter()
                .map(|e| {
                    (
                        e.class.name.clone(),
                        e.subject.name.clone(),
                        e.teacher.id.clone(),
                        e.classroom.id.clone(),
                        e.time_slot.weekday,
                        e.time_slot.period,
                    )
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_invalid_config_refused() {
        let config = ScheduleConfig::new(vec![], TimeTable::default());
        let mut engine = AssignmentEngine::with_seed(config, 0);
        let errors = engine
            .generate(&one_class(Subject::new("Math", 1)), &math_teacher(), &room(40))
            .unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::NoWeekdays);
    }

    #[test]
    fn test_custom_rule_registration() {
        let config = ScheduleConfig::new(
            vec![WeekDay::Monday],
            TimeTable::default().with_periods(4, 0, 0),
        )
        .with_max_consecutive(4);
        let classes = one_class(Subject::new("Math", 3).with_max_periods_per_day(1));
        let teachers = math_teacher();
        let rooms = room(40);

        let mut engine = AssignmentEngine::with_seed(config, 5);
        engine.rules_mut().register(SubjectDailyLimitRule);
        let result = engine.generate(&classes, &teachers, &rooms).unwrap();

        assert_eq!(result.schedule.len(), 1);
        assert_eq!(result.issues.len(), 2);
        assert!(result.stats.rule_rejections > 0);
    }
}
