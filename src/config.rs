//! Solver and server configuration.

use std::net::SocketAddr;

use crate::error::ConfigError;

/// Which subjects each class is scheduled against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubjectScope {
    /// Every registered subject, for every class.
    #[default]
    AllRegistered,
    /// Only the subjects listed in the class's `required_subjects`.
    ClassRequired,
}

/// What happens to lessons already placed for a pair that then fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RollbackPolicy {
    /// Committed lessons stay in the state after a failure.
    #[default]
    KeepPartial,
    /// The state is restored to its value before the failing pair.
    RestorePair,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub subject_scope: SubjectScope,
    pub rollback: RollbackPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Default `env_logger` filter; `RUST_LOG` takes precedence.
    pub log_filter: String,
    pub solver: SolverConfig,
}

pub const BIND_ADDR_VAR: &str = "TIMETABLE_BIND_ADDR";
pub const LOG_VAR: &str = "TIMETABLE_LOG";
pub const SUBJECT_SCOPE_VAR: &str = "TIMETABLE_SUBJECT_SCOPE";
pub const ROLLBACK_VAR: &str = "TIMETABLE_ROLLBACK";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_filter: "info".to_string(),
            solver: SolverConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the `TIMETABLE_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup(BIND_ADDR_VAR) {
            config.bind_addr = addr.parse().map_err(|_| ConfigError::InvalidValue {
                var: BIND_ADDR_VAR,
                value: addr.clone(),
                expected: "a socket address such as 127.0.0.1:8080",
            })?;
        }
        if let Some(filter) = lookup(LOG_VAR) {
            config.log_filter = filter;
        }
        if let Some(scope) = lookup(SUBJECT_SCOPE_VAR) {
            config.solver.subject_scope = match scope.as_str() {
                "all" => SubjectScope::AllRegistered,
                "required" => SubjectScope::ClassRequired,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: SUBJECT_SCOPE_VAR,
                        value: scope,
                        expected: "'all' or 'required'",
                    });
                }
            };
        }
        if let Some(rollback) = lookup(ROLLBACK_VAR) {
            config.solver.rollback = match rollback.as_str() {
                "keep" => RollbackPolicy::KeepPartial,
                "restore" => RollbackPolicy::RestorePair,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: ROLLBACK_VAR,
                        value: rollback,
                        expected: "'keep' or 'restore'",
                    });
                }
            };
        }

        Ok(config)
    }
}
