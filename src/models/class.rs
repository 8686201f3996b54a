//! Class (student group) model.
//!
//! A class is the unit that receives a weekly timetable: a group of
//! students with an ordered list of subjects and their weekly quotas.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::Subject;

/// A student group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    /// Grade label.
    #[serde(default)]
    pub grade: String,
    /// Class name (unique across the school).
    pub name: String,
    /// Number of students.
    pub student_count: u32,
    /// Subjects in input order.
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// Head teacher id, if any. Checked to exist, otherwise unused.
    #[serde(default)]
    pub head_teacher: Option<String>,
    /// Special requirements (e.g. "wheelchair access").
    #[serde(default)]
    pub special_requirements: BTreeSet<String>,
}

impl Class {
    /// Creates a class with no subjects.
    pub fn new(grade: impl Into<String>, name: impl Into<String>, student_count: u32) -> Self {
        Self {
            grade: grade.into(),
            name: name.into(),
            student_count,
            subjects: Vec::new(),
            head_teacher: None,
            special_requirements: BTreeSet::new(),
        }
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Sets the head teacher id.
    pub fn with_head_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.head_teacher = Some(teacher_id.into());
        self
    }

    /// Adds a special requirement.
    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.special_requirements.insert(requirement.into());
        self
    }

    /// Finds a subject by name.
    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }

    /// Weekly periods per subject name.
    pub fn weekly_hours(&self) -> BTreeMap<&str, u32> {
        self.subjects
            .iter()
            .map(|s| (s.name.as_str(), s.weekly_hours))
            .collect()
    }

    /// Total weekly periods across all subjects.
    pub fn total_weekly_hours(&self) -> u64 {
        self.subjects.iter().map(|s| u64::from(s.weekly_hours)).sum()
    }

    /// Subject indices ordered by `(priority, weekly_hours)` descending.
    ///
    /// The sort is stable, so ties keep input order.
    pub fn subjects_by_priority(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.subjects.len()).collect();
        order.sort_by(|&a, &b| {
            let (sa, sb) = (&self.subjects[a], &self.subjects[b]);
            (sb.priority, sb.weekly_hours).cmp(&(sa.priority, sa.weekly_hours))
        });
        order
    }
}
