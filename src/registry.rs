//! Domain registry: teachers, classes and subjects in registration order.
//!
//! Entities are immutable once registered. Lookups go through name-keyed
//! side tables so the schedule state never has to hash whole entities.

use std::collections::HashMap;

use log::debug;

use crate::data::{Class, Subject, Teacher};
use crate::error::{EntityKind, RegistryError};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    teachers: Vec<Teacher>,
    classes: Vec<Class>,
    subjects: Vec<Subject>,
    teacher_index: HashMap<String, usize>,
    class_index: HashMap<String, usize>,
    subject_index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_teacher(&mut self, teacher: Teacher) -> Result<(), RegistryError> {
        insert_unique(
            &mut self.teachers,
            &mut self.teacher_index,
            EntityKind::Teacher,
            teacher.name.clone(),
            teacher,
        )
    }

    pub fn register_class(&mut self, class: Class) -> Result<(), RegistryError> {
        insert_unique(
            &mut self.classes,
            &mut self.class_index,
            EntityKind::Class,
            class.name.clone(),
            class,
        )
    }

    pub fn register_subject(&mut self, subject: Subject) -> Result<(), RegistryError> {
        insert_unique(
            &mut self.subjects,
            &mut self.subject_index,
            EntityKind::Subject,
            subject.name.clone(),
            subject,
        )
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn teacher(&self, name: &str) -> Option<&Teacher> {
        self.teacher_index.get(name).map(|&i| &self.teachers[i])
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.class_index.get(name).map(|&i| &self.classes[i])
    }

    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.subject_index.get(name).map(|&i| &self.subjects[i])
    }

    /// Teachers able to teach `subject`, in registration order.
    pub fn teachers_for(&self, subject: &str) -> Vec<&Teacher> {
        self.teachers.iter().filter(|t| t.teaches(subject)).collect()
    }
}

fn insert_unique<T>(
    items: &mut Vec<T>,
    index: &mut HashMap<String, usize>,
    kind: EntityKind,
    name: String,
    item: T,
) -> Result<(), RegistryError> {
    if index.contains_key(&name) {
        return Err(RegistryError::DuplicateEntity { kind, name });
    }
    debug!("Registered {} '{}'", kind, name);
    index.insert(name, items.len());
    items.push(item);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Day, Slot};

    fn teacher(name: &str, subjects: &[&str]) -> Teacher {
        Teacher::new(
            name,
            subjects.iter().copied(),
            [Slot::new(Day::Monday, 1)],
            Vec::new(),
        )
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = Registry::new();
        registry.register_subject(Subject::new("Math", 4)).unwrap();
        registry.register_subject(Subject::new("Art", 1)).unwrap();
        let names: Vec<_> = registry.subjects().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Math", "Art"]);
        assert_eq!(registry.subject("Art").map(|s| s.hours_per_week), Some(1));
    }

    #[test]
    fn test_duplicate_rejected_and_state_unchanged() {
        let mut registry = Registry::new();
        registry.register_teacher(teacher("Ivanova", &["Math"])).unwrap();

        let err = registry
            .register_teacher(teacher("Ivanova", &["Art"]))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateEntity {
                kind: EntityKind::Teacher,
                name: "Ivanova".into()
            }
        );
        assert_eq!(registry.teachers().len(), 1);
        assert!(registry.teacher("Ivanova").unwrap().teaches("Math"));
        assert!(!registry.teacher("Ivanova").unwrap().teaches("Art"));
    }

    #[test]
    fn test_same_name_across_kinds_allowed() {
        let mut registry = Registry::new();
        registry.register_class(Class::new("Math", ["Math"])).unwrap();
        registry.register_subject(Subject::new("Math", 2)).unwrap();
        assert!(registry.register_class(Class::new("Math", ["Math"])).is_err());
        assert!(registry.class("Math").is_some());
    }

    #[test]
    fn test_teachers_for_in_registration_order() {
        let mut registry = Registry::new();
        registry.register_teacher(teacher("B", &["Math"])).unwrap();
        registry.register_teacher(teacher("A", &["Art"])).unwrap();
        registry.register_teacher(teacher("C", &["Math", "Art"])).unwrap();

        let names: Vec<_> = registry.teachers_for("Math").iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["B", "C"]);
        assert!(registry.teachers_for("History").is_empty());
    }
}
