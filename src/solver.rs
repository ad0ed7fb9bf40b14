use crate::config::{RollbackPolicy, SolverConfig, SubjectScope};
use crate::constraints::{is_hard_feasible, soft_penalty_of_placement};
use crate::data::{Assignment, Class, ScheduleOutput, Slot, Subject, Teacher};
use crate::error::{GenerationFailed, PlacementError};
use crate::registry::Registry;
use crate::state::ScheduleState;
use itertools::Itertools;
use log::{debug, info, trace, warn};
use std::time::Instant;

/// Chooses where the next lesson of a (class, subject) pair goes.
///
/// `candidates` are the teachers able to teach the subject, in registration
/// order. Implementations must only return hard-feasible placements.
pub trait PlacementStrategy {
    fn next_placement<'t>(
        &self,
        candidates: &[&'t Teacher],
        class: &Class,
        state: &ScheduleState,
    ) -> Option<(Slot, &'t Teacher)>;
}

/// Days Monday to Friday, periods 1 to 8, teachers in registration order;
/// the first feasible triple wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl PlacementStrategy for FirstFit {
    fn next_placement<'t>(
        &self,
        candidates: &[&'t Teacher],
        class: &Class,
        state: &ScheduleState,
    ) -> Option<(Slot, &'t Teacher)> {
        Slot::week().find_map(|slot| {
            candidates
                .iter()
                .copied()
                .find(|teacher| is_hard_feasible(teacher, class, slot, state))
                .map(|teacher| (slot, teacher))
        })
    }
}

/// Greedy assignment engine over a populated registry.
#[derive(Debug, Clone)]
pub struct Solver<'r, S = FirstFit> {
    registry: &'r Registry,
    config: SolverConfig,
    strategy: S,
}

impl<'r> Solver<'r, FirstFit> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            config: SolverConfig::default(),
            strategy: FirstFit,
        }
    }
}

impl<'r, S: PlacementStrategy> Solver<'r, S> {
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_strategy<T: PlacementStrategy>(self, strategy: T) -> Solver<'r, T> {
        Solver {
            registry: self.registry,
            config: self.config,
            strategy,
        }
    }

    /// Places `subject.hours_per_week` single-period lessons for `class`.
    ///
    /// A placement the strategy proposes is re-checked before it is committed;
    /// an infeasible one ends the call with `PlacementExhausted`. On failure, lessons committed by earlier iterations of this call stay
    /// in `state`.
    pub fn place_subject_for_class(
        &self,
        subject: &Subject,
        class: &Class,
        state: &mut ScheduleState,
    ) -> Result<(), PlacementError> {
        let candidates = self.registry.teachers_for(&subject.name);
        if candidates.is_empty() {
            return Err(PlacementError::NoEligibleTeacher {
                subject: subject.name.clone(),
            });
        }

        for placed in 0..subject.hours_per_week {
            let exhausted = || PlacementError::PlacementExhausted {
                class: class.name.clone(),
                subject: subject.name.clone(),
                placed,
                required: subject.hours_per_week,
            };
            let Some((slot, teacher)) = self.strategy.next_placement(&candidates, class, state) else {
                return Err(exhausted());
            };
            if !is_hard_feasible(teacher, class, slot, state) || !teacher.teaches(&subject.name) {
                warn!(
                    "Strategy proposed infeasible placement of {} for {} with {} at {}",
                    subject.name, class.name, teacher.name, slot
                );
                return Err(exhausted());
            }

            state.commit(Assignment {
                teacher: teacher.name.clone(),
                class: class.name.clone(),
                subject: subject.name.clone(),
                slot,
            });
            let penalty = soft_penalty_of_placement(teacher, slot, state);
            state.add_soft_penalty(penalty);
            trace!(
                "Placed {} for {} with {} at {} (penalty {})",
                subject.name, class.name, teacher.name, slot, penalty
            );
        }

        Ok(())
    }

    /// Schedules every class in registration order, subjects by descending
    /// weekly hours (ties in registration order). Stops at the first failure.
    pub fn generate(&self, state: &mut ScheduleState) -> Result<(), GenerationFailed> {
        let start_time = Instant::now();
        info!(
            "Generating schedule for {} classes, {} subjects and {} teachers...",
            self.registry.classes().len(),
            self.registry.subjects().len(),
            self.registry.teachers().len()
        );

        let registered = by_hours_descending(self.registry.subjects().iter());

        for class in self.registry.classes() {
            let subjects = match self.config.subject_scope {
                SubjectScope::AllRegistered => registered.clone(),
                SubjectScope::ClassRequired => self.required_subjects(class)?,
            };

            for subject in subjects {
                let snapshot = match self.config.rollback {
                    RollbackPolicy::KeepPartial => None,
                    RollbackPolicy::RestorePair => Some(state.clone()),
                };

                if let Err(reason) = self.place_subject_for_class(subject, class, state) {
                    if let Some(snapshot) = snapshot {
                        *state = snapshot;
                    }
                    warn!("Could not schedule {} for {}: {}", subject.name, class.name, reason);
                    return Err(GenerationFailed {
                        class: class.name.clone(),
                        subject: subject.name.clone(),
                        reason,
                    });
                }
                debug!(
                    "Scheduled {} hours of {} for {}",
                    subject.hours_per_week, subject.name, class.name
                );
            }
        }

        info!(
            "Schedule generated in {:.2?} with score {}",
            start_time.elapsed(),
            state.score()
        );
        Ok(())
    }

    /// The class's own subjects, deduplicated and resolved, by descending hours.
    fn required_subjects(&self, class: &Class) -> Result<Vec<&'r Subject>, GenerationFailed> {
        let subjects = class
            .required_subjects
            .iter()
            .unique()
            .map(|name| {
                self.registry.subject(name).ok_or_else(|| GenerationFailed {
                    class: class.name.clone(),
                    subject: name.clone(),
                    reason: PlacementError::UnknownSubject {
                        class: class.name.clone(),
                        subject: name.clone(),
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(by_hours_descending(subjects.into_iter()))
    }
}

/// Stable sort, so equal hours keep their incoming order.
fn by_hours_descending<'a>(subjects: impl Iterator<Item = &'a Subject>) -> Vec<&'a Subject> {
    subjects
        .sorted_by(|a, b| b.hours_per_week.cmp(&a.hours_per_week))
        .collect()
}

/// Runs one generation attempt on a fresh state and returns the schedule.
pub fn solve(registry: &Registry, config: SolverConfig) -> Result<ScheduleOutput, GenerationFailed> {
    let mut state = ScheduleState::new(registry);
    Solver::new(registry)
        .with_config(config)
        .generate(&mut state)?;
    Ok(state.to_output())
}
