use serde::Serialize;
use std::fmt;

/// Weight of one hard violation relative to one point of soft penalty.
pub const HARD_VIOLATION_WEIGHT: u32 = 1000;

/// Schedule quality; lower is better.
///
/// `hard_violations` counts constraints tracked but not enforced before a
/// commit. The solver blocks every infeasible placement up front, so it
/// stays 0 for schedules it produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub hard_violations: u32,
    pub soft_penalty: u32,
}

impl Score {
    pub fn total(&self) -> u32 {
        self.hard_violations * HARD_VIOLATION_WEIGHT + self.soft_penalty
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (hard: {}, soft: {})",
            self.total(),
            self.hard_violations,
            self.soft_penalty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total() {
        let score = Score {
            hard_violations: 2,
            soft_penalty: 25,
        };
        assert_eq!(score.total(), 2025);
        assert_eq!(Score::default().total(), 0);
    }

    #[test]
    fn test_hard_violation_dominates() {
        let hard = Score {
            hard_violations: 1,
            soft_penalty: 0,
        };
        let soft = Score {
            hard_violations: 0,
            soft_penalty: 999,
        };
        assert!(soft.total() < hard.total());
    }

    #[test]
    fn test_display() {
        let score = Score {
            hard_violations: 0,
            soft_penalty: 25,
        };
        assert_eq!(score.to_string(), "25 (hard: 0, soft: 25)");
    }
}
