use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use itertools::iproduct;

use crate::error::SlotKeyError;

/// Lessons per school day; periods are numbered `1..=PERIODS_PER_DAY`.
pub const PERIODS_PER_DAY: u8 = 8;

/// A school day. Declaration order is the scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "MONDAY",
            Day::Tuesday => "TUESDAY",
            Day::Wednesday => "WEDNESDAY",
            Day::Thursday => "THURSDAY",
            Day::Friday => "FRIDAY",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lesson period on one day. Serializes as `{"day": .., "period": ..}`;
/// its textual key is `"<DAY>_<period>"`. Only parsed keys are range-checked;
/// see [`Slot::is_in_week`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Slot {
    pub day: Day,
    pub period: u8,
}

impl Slot {
    pub const fn new(day: Day, period: u8) -> Self {
        Self { day, period }
    }

    /// Every slot of the week, Monday period 1 through Friday period 8.
    pub fn week() -> impl Iterator<Item = Slot> {
        iproduct!(Day::ALL, 1..=PERIODS_PER_DAY).map(|(day, period)| Slot::new(day, period))
    }

    /// Whether the period lies in `1..=PERIODS_PER_DAY`.
    pub fn is_in_week(&self) -> bool {
        (1..=PERIODS_PER_DAY).contains(&self.period)
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.day, self.period)
    }
}

impl FromStr for Slot {
    type Err = SlotKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let (day, period) = key
            .split_once('_')
            .ok_or_else(|| SlotKeyError::MissingSeparator(key.to_string()))?;

        let day = Day::ALL
            .into_iter()
            .find(|d| d.as_str() == day)
            .ok_or_else(|| SlotKeyError::UnknownDay {
                key: key.to_string(),
                day: day.to_string(),
            })?;

        // digits only, no sign, no leading zero
        let bad_period = || SlotKeyError::InvalidPeriod(key.to_string());
        if period.is_empty() || !period.bytes().all(|b| b.is_ascii_digit()) || period.starts_with('0') {
            return Err(bad_period());
        }
        let period: u8 = period.parse().map_err(|_| bad_period())?;
        if !(1..=PERIODS_PER_DAY).contains(&period) {
            return Err(bad_period());
        }

        Ok(Slot::new(day, period))
    }
}

/// A subject with its weekly lesson count.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Subject {
    pub name: String,
    pub hours_per_week: u32,
}

impl Subject {
    pub fn new(name: impl Into<String>, hours_per_week: u32) -> Self {
        Self {
            name: name.into(),
            hours_per_week,
        }
    }
}

/// A teacher as seen by the engine: names of subjects taught plus parsed slot sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    pub name: String,
    pub subjects_taught: HashSet<String>,
    pub available_slots: HashSet<Slot>,
    /// Expected to be a subset of `available_slots`; not enforced.
    pub preferences: HashSet<Slot>,
}

impl Teacher {
    pub fn new(
        name: impl Into<String>,
        subjects_taught: impl IntoIterator<Item = impl Into<String>>,
        available_slots: impl IntoIterator<Item = Slot>,
        preferences: impl IntoIterator<Item = Slot>,
    ) -> Self {
        Self {
            name: name.into(),
            subjects_taught: subjects_taught.into_iter().map(Into::into).collect(),
            available_slots: available_slots.into_iter().collect(),
            preferences: preferences.into_iter().collect(),
        }
    }

    pub fn teaches(&self, subject: &str) -> bool {
        self.subjects_taught.contains(subject)
    }

    pub fn is_available(&self, slot: Slot) -> bool {
        self.available_slots.contains(&slot)
    }

    pub fn prefers(&self, slot: Slot) -> bool {
        self.preferences.contains(&slot)
    }
}

/// A class (e.g. "8A") and the subjects it requires, in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub name: String,
    pub required_subjects: Vec<String>,
}

impl Class {
    pub fn new(name: impl Into<String>, required_subjects: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            required_subjects: required_subjects.into_iter().map(Into::into).collect(),
        }
    }
}

/// Teacher registration payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeacherInput {
    pub name: String,
    pub subjects: Vec<Subject>,
    pub available_slots: Vec<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
}

impl TryFrom<TeacherInput> for Teacher {
    type Error = SlotKeyError;

    fn try_from(input: TeacherInput) -> Result<Self, Self::Error> {
        let available_slots = parse_slot_keys(&input.available_slots)?;
        let preferences = parse_slot_keys(&input.preferences)?;
        Ok(Teacher::new(
            input.name,
            input.subjects.into_iter().map(|s| s.name),
            available_slots,
            preferences,
        ))
    }
}

/// Class registration payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassInput {
    pub name: String,
    pub subjects: Vec<Subject>,
}

impl From<ClassInput> for Class {
    fn from(input: ClassInput) -> Self {
        Class::new(input.name, input.subjects.into_iter().map(|s| s.name))
    }
}

fn parse_slot_keys(keys: &[String]) -> Result<Vec<Slot>, SlotKeyError> {
    keys.iter().map(|k| k.parse()).collect()
}

/// The atomic committed unit of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Assignment {
    pub teacher: String,
    pub class: String,
    pub subject: String,
    pub slot: Slot,
}

/// Result of a successful generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleOutput {
    pub success: bool,
    pub teacher_schedules: BTreeMap<String, Vec<Slot>>,
    pub class_schedules: BTreeMap<String, Vec<Slot>>,
    pub score: u32,
    pub hard_violations: u32,
    pub soft_penalty: u32,
    pub assignments: Vec<Assignment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_key_format() {
        assert_eq!(Slot::new(Day::Monday, 1).key(), "MONDAY_1");
        assert_eq!(Slot::new(Day::Friday, 8).to_string(), "FRIDAY_8");
    }

    #[test]
    fn test_slot_key_parse() {
        assert_eq!("WEDNESDAY_3".parse::<Slot>(), Ok(Slot::new(Day::Wednesday, 3)));
        assert_eq!("FRIDAY_8".parse::<Slot>(), Ok(Slot::new(Day::Friday, 8)));
    }

    #[test]
    fn test_slot_key_rejects_malformed() {
        assert!(matches!("MONDAY1".parse::<Slot>(), Err(SlotKeyError::MissingSeparator(_))));
        assert!(matches!("monday_1".parse::<Slot>(), Err(SlotKeyError::UnknownDay { .. })));
        assert!(matches!("SATURDAY_1".parse::<Slot>(), Err(SlotKeyError::UnknownDay { .. })));
        for bad in ["MONDAY_0", "MONDAY_9", "MONDAY_01", "MONDAY_+1", "MONDAY_", "MONDAY_1a", "MONDAY_300"] {
            assert!(
                matches!(bad.parse::<Slot>(), Err(SlotKeyError::InvalidPeriod(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_week_order() {
        let week: Vec<Slot> = Slot::week().collect();
        assert_eq!(week.len(), 40);
        assert_eq!(week[0], Slot::new(Day::Monday, 1));
        assert_eq!(week[7], Slot::new(Day::Monday, 8));
        assert_eq!(week[8], Slot::new(Day::Tuesday, 1));
        assert_eq!(week[39], Slot::new(Day::Friday, 8));
    }

    #[test]
    fn test_is_in_week() {
        assert!(Slot::new(Day::Monday, 1).is_in_week());
        assert!(Slot::new(Day::Friday, 8).is_in_week());
        assert!(!Slot::new(Day::Monday, 0).is_in_week());
        assert!(!Slot::new(Day::Monday, 9).is_in_week());
        assert!(Slot::week().all(|s| s.is_in_week()));
    }

    #[test]
    fn test_slot_serializes_as_day_and_period() {
        let json = serde_json::to_value(Slot::new(Day::Thursday, 2)).unwrap();
        assert_eq!(json, serde_json::json!({"day": "THURSDAY", "period": 2}));
    }

    #[test]
    fn test_teacher_from_input() {
        let input = TeacherInput {
            name: "Ivanova".into(),
            subjects: vec![Subject::new("Math", 4)],
            available_slots: vec!["MONDAY_1".into(), "MONDAY_2".into()],
            preferences: vec!["MONDAY_1".into()],
        };
        let teacher = Teacher::try_from(input).unwrap();
        assert!(teacher.teaches("Math"));
        assert!(teacher.is_available(Slot::new(Day::Monday, 2)));
        assert!(teacher.prefers(Slot::new(Day::Monday, 1)));
        assert!(!teacher.prefers(Slot::new(Day::Monday, 2)));
    }

    #[test]
    fn test_teacher_from_input_bad_key() {
        let input = TeacherInput {
            name: "Ivanova".into(),
            subjects: vec![],
            available_slots: vec!["MONDAY_9".into()],
            preferences: vec![],
        };
        assert!(Teacher::try_from(input).is_err());
    }
}
