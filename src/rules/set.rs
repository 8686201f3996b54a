//! Ordered rule collection with fail-fast mandatory evaluation.
//!
//! Rules are kept sorted by priority tier; within a tier they keep
//! registration order. Outcomes are memoized per schedule state: the cache
//! key is derived from the schedule's entry count and revision plus the
//! candidate's class, subject, teacher, classroom and slot, and the cache is
//! dropped whenever the schedule's revision moves.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use super::builtin::{
    ClassroomAvailabilityRule, ClassroomCapacityRule, ClassroomSuitabilityRule,
    ConflictingSubjectsRule, SubjectConsecutiveRule, SubjectDailyLimitRule, SubjectDayPartRule,
    TeacherAvailabilityRule, TeacherDailyLoadRule, TeacherPreferenceRule,
};
use super::{Rule, RuleCategory, RulePriority};
use crate::models::{Schedule, ScheduleEntry, WeekDay};

/// Combined verdict of a rule set on one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Whether every evaluated rule passed.
    pub valid: bool,
    /// `[rule name] message` for every failed rule, in evaluation order.
    pub messages: Vec<String>,
}

/// Serializable listing of one registered rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub name: String,
    pub category: RuleCategory,
    pub priority: RulePriority,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
struct RegisteredRule {
    rule: Arc<dyn Rule>,
    enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    entry_count: usize,
    revision: u64,
    class: String,
    subject: String,
    teacher: String,
    classroom: String,
    weekday: WeekDay,
    period: u32,
}

impl CacheKey {
    fn new(schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> Self {
        Self {
            entry_count: schedule.len(),
            revision: schedule.revision(),
            class: entry.class.name.clone(),
            subject: entry.subject.name.clone(),
            teacher: entry.teacher.id.clone(),
            classroom: entry.classroom.id.clone(),
            weekday: entry.time_slot.weekday,
            period: entry.time_slot.period,
        }
    }
}

/// A prioritized, pluggable collection of rules.
///
/// # Example
/// ```
/// use timetable_engine::rules::{RulePriority, RuleSet};
///
/// let rules = RuleSet::standard(2);
/// let tiers: Vec<_> = rules.summary().into_iter().map(|r| r.priority).collect();
/// assert_eq!(tiers, vec![RulePriority::Mandatory, RulePriority::Mandatory, RulePriority::High]);
/// ```
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: Vec<RegisteredRule>,
    cache: HashMap<CacheKey, Validation>,
    cached_revision: Option<(usize, u64)>,
    cache_hits: u64,
    cache_misses: u64,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Teacher availability, classroom capacity and the consecutive-period
    /// limit.
    pub fn standard(max_consecutive: u32) -> Self {
        Self::new()
            .with_rule(SubjectConsecutiveRule::new(max_consecutive))
            .with_rule(TeacherAvailabilityRule)
            .with_rule(ClassroomCapacityRule)
    }

    /// The standard rules plus day-part, room, daily-load, preference and
    /// conflicting-subject rules.
    pub fn extended(max_consecutive: u32) -> Self {
        Self::standard(max_consecutive)
            .with_rule(ClassroomSuitabilityRule)
            .with_rule(ClassroomAvailabilityRule)
            .with_rule(SubjectDayPartRule)
            .with_rule(SubjectDailyLimitRule)
            .with_rule(TeacherDailyLoadRule)
            .with_rule(TeacherPreferenceRule)
            .with_rule(ConflictingSubjectsRule)
    }

    /// Adds a rule (builder form).
    pub fn with_rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.register(rule);
        self
    }

    /// Adds a rule after every registered rule of the same or higher tier.
    pub fn register<R: Rule + 'static>(&mut self, rule: R) {
        self.register_shared(Arc::new(rule));
    }

    /// Adds an already shared rule.
    pub fn register_shared(&mut self, rule: Arc<dyn Rule>) {
        let priority = rule.priority();
        let pos = self
            .rules
            .iter()
            .position(|r| r.rule.priority() > priority)
            .unwrap_or(self.rules.len());
        debug!("registered rule '{}' ({:?})", rule.name(), priority);
        self.rules.insert(
            pos,
            RegisteredRule {
                rule,
                enabled: true,
            },
        );
        self.clear_cache();
    }

    /// Removes every rule named `name`. Returns whether any was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.rule.name() != name);
        let removed = self.rules.len() != before;
        if removed {
            debug!("removed rule '{name}'");
            self.clear_cache();
        }
        removed
    }

    /// Enables or disables the rule named `name`. Returns whether it exists.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        let mut found = false;
        for r in self.rules.iter_mut().filter(|r| r.rule.name() == name) {
            r.enabled = enabled;
            found = true;
        }
        if found {
            self.clear_cache();
        }
        found
    }

    /// Number of registered rules (enabled or not).
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Enabled rules in evaluation order, optionally limited to one category.
    pub fn active_rules(&self, category: Option<RuleCategory>) -> Vec<&dyn Rule> {
        self.rules
            .iter()
            .filter(|r| r.enabled && category.map_or(true, |c| r.rule.category() == c))
            .map(|r| r.rule.as_ref())
            .collect()
    }

    /// Listing of every registered rule in evaluation order.
    pub fn summary(&self) -> Vec<RuleSummary> {
        self.rules
            .iter()
            .map(|r| RuleSummary {
                name: r.rule.name().to_string(),
                category: r.rule.category(),
                priority: r.rule.priority(),
                enabled: r.enabled,
            })
            .collect()
    }

    /// Evaluates every enabled rule against `entry` without caching.
    ///
    /// Stops at the first mandatory failure; other failures are collected
    /// and evaluation continues.
    pub fn evaluate(&self, schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> Validation {
        let mut messages = Vec::new();
        for r in self.rules.iter().filter(|r| r.enabled) {
            let outcome = r.rule.check(schedule, entry);
            if outcome.passed {
                continue;
            }
            messages.push(format!("[{}] {}", r.rule.name(), outcome.message));
            if r.rule.priority() == RulePriority::Mandatory {
                return Validation {
                    valid: false,
                    messages,
                };
            }
        }
        Validation {
            valid: messages.is_empty(),
            messages,
        }
    }

    /// Cached form of [`RuleSet::evaluate`].
    pub fn validate(&mut self, schedule: &Schedule<'_>, entry: &ScheduleEntry<'_>) -> Validation {
        let state = (schedule.len(), schedule.revision());
        if self.cached_revision != Some(state) {
            self.cache.clear();
            self.cached_revision = Some(state);
        }

        let key = CacheKey::new(schedule, entry);
        if let Some(hit) = self.cache.get(&key) {
            self.cache_hits += 1;
            return hit.clone();
        }

        self.cache_misses += 1;
        let verdict = self.evaluate(schedule, entry);
        if !verdict.valid {
            debug!(
                "{} {} at {} p{} rejected: {}",
                entry.class.name,
                entry.subject.name,
                entry.time_slot.weekday,
                entry.time_slot.period,
                verdict.messages.join("; ")
            );
        }
        self.cache.insert(key, verdict.clone());
        verdict
    }

    /// Drops every cached outcome.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.cached_revision = None;
    }

    /// Lookups answered from the cache.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Lookups that ran the rules.
    pub fn cache_misses(&self) -> u64 {
        self.cache_misses
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| {
                        format!(
                            "{}({:?}, enabled={})",
                            r.rule.name(),
                            r.rule.priority(),
                            r.enabled
                        )
                    })
                    .collect::<Vec<_>>(),
            )
            .field("cached", &self.cache.len())
            .finish()
    }
}
