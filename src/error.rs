//! Error types for registration, slot key parsing, configuration and generation.

use thiserror::Error;

/// A slot key that does not match `<DAY>_<N>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotKeyError {
    #[error("slot key '{0}' is missing the '_' separator")]
    MissingSeparator(String),

    #[error("slot key '{key}' names unknown day '{day}'")]
    UnknownDay { key: String, day: String },

    #[error("slot key '{0}' has a period outside 1..=8")]
    InvalidPeriod(String),
}

/// Which kind of entity a registry error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Teacher,
    Class,
    Subject,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Teacher => "teacher",
            EntityKind::Class => "class",
            EntityKind::Subject => "subject",
        };
        f.write_str(name)
    }
}

/// Registration failures. The registry is left unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{kind} '{name}' is already registered")]
    DuplicateEntity { kind: EntityKind, name: String },

    #[error(transparent)]
    InvalidSlotKey(#[from] SlotKeyError),
}

/// Why a single (class, subject) pair could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("no registered teacher teaches '{subject}'")]
    NoEligibleTeacher { subject: String },

    #[error("no feasible slot left for '{subject}' in class '{class}' ({placed} of {required} hours placed)")]
    PlacementExhausted {
        class: String,
        subject: String,
        placed: u32,
        required: u32,
    },

    #[error("class '{class}' requires unregistered subject '{subject}'")]
    UnknownSubject { class: String, subject: String },
}

impl PlacementError {
    /// Stable variant name used on the wire.
    pub fn reason(&self) -> &'static str {
        match self {
            PlacementError::NoEligibleTeacher { .. } => "NoEligibleTeacher",
            PlacementError::PlacementExhausted { .. } => "PlacementExhausted",
            PlacementError::UnknownSubject { .. } => "UnknownSubject",
        }
    }
}

/// Aggregate failure of a generation run, naming the pair that stopped it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("generation failed at class '{class}', subject '{subject}': {reason}")]
pub struct GenerationFailed {
    pub class: String,
    pub subject: String,
    #[source]
    pub reason: PlacementError,
}

/// Malformed configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}' (expected {expected})")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}
