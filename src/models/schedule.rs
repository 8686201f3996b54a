//! Schedule aggregate.
//!
//! A schedule is the ordered set of committed sessions produced by one
//! generation run, together with the configuration it was built under.
//! Entries borrow the caller's reference data (classes, subjects, teachers,
//! classrooms) for the lifetime of the run; nothing here mutates them.
//!
//! # Invariant
//! No two entries share a weekday and period while also sharing the class,
//! the teacher or the classroom. [`Schedule::add`] enforces this and rejects
//! a conflicting entry without mutating the schedule.

use super::{Class, Classroom, ScheduleConfig, Subject, Teacher, TimeSlot, WeekDay};

/// One committed session.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry<'a> {
    pub class: &'a Class,
    pub subject: &'a Subject,
    pub teacher: &'a Teacher,
    pub classroom: &'a Classroom,
    pub time_slot: TimeSlot,
    /// Pinned by hand; the engine never moves or removes fixed entries.
    pub is_fixed: bool,
}

impl<'a> ScheduleEntry<'a> {
    /// Creates a non-fixed entry.
    pub fn new(
        class: &'a Class,
        subject: &'a Subject,
        teacher: &'a Teacher,
        classroom: &'a Classroom,
        time_slot: TimeSlot,
    ) -> Self {
        Self {
            class,
            subject,
            teacher,
            classroom,
            time_slot,
            is_fixed: false,
        }
    }

    /// Marks the entry as fixed.
    pub fn fixed(mut self) -> Self {
        self.is_fixed = true;
        self
    }

    /// Whether both entries occupy the same weekday and period.
    #[inline]
    pub fn same_period(&self, other: &ScheduleEntry<'_>) -> bool {
        self.time_slot.same_period(&other.time_slot)
    }

    /// Whether the two entries would double-book a class, teacher or room.
    pub fn clashes_with(&self, other: &ScheduleEntry<'_>) -> bool {
        self.same_period(other)
            && (self.class.name == other.class.name
                || self.teacher.id == other.teacher.id
                || self.classroom.id == other.classroom.id)
    }

    /// Whether both entries describe the same session (same people, room, slot).
    pub fn same_session(&self, other: &ScheduleEntry<'_>) -> bool {
        self.class.name == other.class.name
            && self.subject.name == other.subject.name
            && self.teacher.id == other.teacher.id
            && self.classroom.id == other.classroom.id
            && self.time_slot == other.time_slot
    }

    /// Entry-local problems, independent of the rest of the schedule.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.teacher.is_available_at(&self.time_slot) {
            problems.push(format!(
                "teacher {} is not available at this time",
                self.teacher.name
            ));
        }
        if !self.classroom.is_suitable_for(self.subject) {
            problems.push(format!(
                "classroom {} is not suitable for {}",
                self.classroom.name, self.subject.name
            ));
        }
        if !self.subject.can_be_scheduled_at(&self.time_slot) {
            problems.push(format!(
                "subject {} cannot be scheduled in the {:?}",
                self.subject.name, self.time_slot.day_part
            ));
        }
        problems
    }
}

/// A weekly timetable under construction or complete.
#[derive(Debug, Clone)]
pub struct Schedule<'a> {
    config: ScheduleConfig,
    entries: Vec<ScheduleEntry<'a>>,
    revision: u64,
}

impl<'a> Schedule<'a> {
    /// Creates an empty schedule.
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            revision: 0,
        }
    }

    /// Configuration the schedule is built under.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[ScheduleEntry<'a>] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schedule has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mutation counter; bumps on every successful add or remove.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether `entry` would double-book a class, teacher or classroom.
    pub fn has_conflict(&self, entry: &ScheduleEntry<'_>) -> bool {
        self.conflicting_entry(entry).is_some()
    }

    /// First existing entry that `entry` clashes with.
    pub fn conflicting_entry(&self, entry: &ScheduleEntry<'_>) -> Option<&ScheduleEntry<'a>> {
        self.entries.iter().find(|e| e.clashes_with(entry))
    }

    /// Appends `entry` unless it conflicts. Returns whether it was added.
    pub fn add(&mut self, entry: ScheduleEntry<'a>) -> bool {
        if self.has_conflict(&entry) {
            return false;
        }
        self.entries.push(entry);
        self.revision += 1;
        true
    }

    /// Removes the matching non-fixed entry. Returns whether one was removed.
    pub fn remove(&mut self, entry: &ScheduleEntry<'_>) -> bool {
        match self
            .entries
            .iter()
            .position(|e| !e.is_fixed && e.same_session(entry))
        {
            Some(idx) => {
                self.entries.remove(idx);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Entries for a class.
    pub fn entries_for_class<'s>(
        &'s self,
        class_name: &'s str,
    ) -> impl Iterator<Item = &'s ScheduleEntry<'a>> + 's {
        self.entries.iter().filter(move |e| e.class.name == class_name)
    }

    /// Entries taught by a teacher.
    pub fn entries_for_teacher<'s>(
        &'s self,
        teacher_id: &'s str,
    ) -> impl Iterator<Item = &'s ScheduleEntry<'a>> + 's {
        self.entries.iter().filter(move |e| e.teacher.id == teacher_id)
    }

    /// Entries held in a classroom.
    pub fn entries_for_classroom<'s>(
        &'s self,
        classroom_id: &'s str,
    ) -> impl Iterator<Item = &'s ScheduleEntry<'a>> + 's {
        self.entries
            .iter()
            .filter(move |e| e.classroom.id == classroom_id)
    }

    /// Entries on a weekday.
    pub fn entries_on_day(&self, weekday: WeekDay) -> impl Iterator<Item = &ScheduleEntry<'a>> {
        self.entries
            .iter()
            .filter(move |e| e.time_slot.weekday == weekday)
    }

    /// Entries of one subject for one class.
    pub fn entries_for_class_subject<'s>(
        &'s self,
        class_name: &'s str,
        subject_name: &'s str,
    ) -> impl Iterator<Item = &'s ScheduleEntry<'a>> + 's {
        self.entries
            .iter()
            .filter(move |e| e.class.name == class_name && e.subject.name == subject_name)
    }
}
