//! Schedule state for one generation attempt.
//!
//! All maps are keyed by entity name. A state is created empty from a
//! registry at the start of an attempt and is only mutated by the solver.

use std::collections::{BTreeMap, HashMap};

use crate::data::{Assignment, Day, ScheduleOutput, Slot};
use crate::registry::Registry;
use crate::score::Score;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleState {
    teacher_slots: HashMap<String, Vec<Slot>>,
    class_slots: HashMap<String, Vec<Slot>>,
    /// Per generation run, shared by every class taking the subject.
    subject_slots: HashMap<String, Vec<Slot>>,
    assignments: Vec<Assignment>,
    score: Score,
}

impl ScheduleState {
    /// Empty state with one (empty) slice per registered entity.
    pub fn new(registry: &Registry) -> Self {
        let empty = |names: Vec<&str>| -> HashMap<String, Vec<Slot>> {
            names.into_iter().map(|n| (n.to_string(), Vec::new())).collect()
        };
        Self {
            teacher_slots: empty(registry.teachers().iter().map(|t| t.name.as_str()).collect()),
            class_slots: empty(registry.classes().iter().map(|c| c.name.as_str()).collect()),
            subject_slots: empty(registry.subjects().iter().map(|s| s.name.as_str()).collect()),
            assignments: Vec::new(),
            score: Score::default(),
        }
    }

    pub fn teacher_busy(&self, teacher: &str, slot: Slot) -> bool {
        self.teacher_slots
            .get(teacher)
            .is_some_and(|slots| slots.contains(&slot))
    }

    pub fn class_busy(&self, class: &str, slot: Slot) -> bool {
        self.class_slots
            .get(class)
            .is_some_and(|slots| slots.contains(&slot))
    }

    pub fn teacher_slots(&self, teacher: &str) -> &[Slot] {
        self.teacher_slots.get(teacher).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn class_slots(&self, class: &str) -> &[Slot] {
        self.class_slots.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn subject_slots(&self, subject: &str) -> &[Slot] {
        self.subject_slots.get(subject).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Periods on `day` where the teacher already has a lesson.
    pub fn teacher_periods_on(&self, teacher: &str, day: Day) -> impl Iterator<Item = u8> + '_ {
        self.teacher_slots(teacher)
            .iter()
            .filter(move |s| s.day == day)
            .map(|s| s.period)
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Lessons placed for one (class, subject) pair.
    pub fn lesson_count(&self, class: &str, subject: &str) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.class == class && a.subject == subject)
            .count()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Records a placement in the teacher, class and subject slices.
    pub(crate) fn commit(&mut self, assignment: Assignment) {
        let slot = assignment.slot;
        self.teacher_slots
            .entry(assignment.teacher.clone())
            .or_default()
            .push(slot);
        self.class_slots
            .entry(assignment.class.clone())
            .or_default()
            .push(slot);
        self.subject_slots
            .entry(assignment.subject.clone())
            .or_default()
            .push(slot);
        self.assignments.push(assignment);
    }

    pub(crate) fn add_soft_penalty(&mut self, penalty: u32) {
        self.score.soft_penalty += penalty;
    }

    /// Snapshot of the per-entity schedules, ordered by name.
    pub fn to_output(&self) -> ScheduleOutput {
        let ordered = |map: &HashMap<String, Vec<Slot>>| -> BTreeMap<String, Vec<Slot>> {
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };
        ScheduleOutput {
            success: true,
            teacher_schedules: ordered(&self.teacher_slots),
            class_schedules: ordered(&self.class_slots),
            score: self.score.total(),
            hard_violations: self.score.hard_violations,
            soft_penalty: self.score.soft_penalty,
            assignments: self.assignments.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Class, Subject, Teacher};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register_teacher(Teacher::new("T", ["Math"], Slot::week(), Vec::new()))
            .unwrap();
        registry.register_class(Class::new("8A", ["Math"])).unwrap();
        registry.register_subject(Subject::new("Math", 2)).unwrap();
        registry
    }

    fn lesson(slot: Slot) -> Assignment {
        Assignment {
            teacher: "T".into(),
            class: "8A".into(),
            subject: "Math".into(),
            slot,
        }
    }

    #[test]
    fn test_new_state_has_empty_slices() {
        let state = ScheduleState::new(&registry());
        let output = state.to_output();
        assert_eq!(output.teacher_schedules.get("T"), Some(&Vec::new()));
        assert_eq!(output.class_schedules.get("8A"), Some(&Vec::new()));
        assert_eq!(output.score, 0);
        assert!(state.assignments().is_empty());
    }

    #[test]
    fn test_commit_updates_every_slice() {
        let mut state = ScheduleState::new(&registry());
        let slot = Slot::new(Day::Tuesday, 3);
        state.commit(lesson(slot));

        assert!(state.teacher_busy("T", slot));
        assert!(state.class_busy("8A", slot));
        assert!(!state.teacher_busy("T", Slot::new(Day::Tuesday, 4)));
        assert_eq!(state.subject_slots("Math"), &[slot]);
        assert_eq!(state.lesson_count("8A", "Math"), 1);
        assert_eq!(state.teacher_periods_on("T", Day::Tuesday).collect::<Vec<_>>(), [3]);
        assert_eq!(state.teacher_periods_on("T", Day::Monday).count(), 0);
    }

    #[test]
    fn test_unknown_names_are_free() {
        let state = ScheduleState::new(&registry());
        assert!(!state.teacher_busy("Nobody", Slot::new(Day::Monday, 1)));
        assert!(state.class_slots("9B").is_empty());
    }
}
