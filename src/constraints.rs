//! Hard feasibility and soft penalty of a candidate placement.

use crate::data::{Class, PERIODS_PER_DAY, Slot, Teacher};
use crate::state::ScheduleState;

/// Penalty for a lesson outside the teacher's preferred slots.
pub const NOT_PREFERRED_PENALTY: u32 = 5;
/// Penalty per period that extends a same-day run past `MAX_CONSECUTIVE_LESSONS`.
pub const LONG_RUN_PENALTY: u32 = 10;
pub const MAX_CONSECUTIVE_LESSONS: u32 = 3;

/// True iff `slot` is a period of the week, the teacher is available at it
/// and neither the teacher nor the class already has a lesson there.
pub fn is_hard_feasible(teacher: &Teacher, class: &Class, slot: Slot, state: &ScheduleState) -> bool {
    slot.is_in_week()
        && teacher.is_available(slot)
        && !state.teacher_busy(&teacher.name, slot)
        && !state.class_busy(&class.name, slot)
}

/// Soft penalty of placing `teacher` at `slot`, with `slot` counted as taken.
///
/// Walks periods 1..=8 of the slot's day with a run counter that resets on
/// every free period; each period where the counter exceeds
/// `MAX_CONSECUTIVE_LESSONS` adds `LONG_RUN_PENALTY`. The whole day is
/// walked, so earlier long runs on the same day are charged again.
pub fn soft_penalty_of_placement(teacher: &Teacher, slot: Slot, state: &ScheduleState) -> u32 {
    let mut penalty = 0;

    if !teacher.prefers(slot) {
        penalty += NOT_PREFERRED_PENALTY;
    }

    // periods outside 1..=8 never take part in a run
    let mut busy = [false; PERIODS_PER_DAY as usize + 1];
    for period in state
        .teacher_periods_on(&teacher.name, slot.day)
        .chain([slot.period])
        .filter(|p| (1..=PERIODS_PER_DAY).contains(p))
    {
        busy[period as usize] = true;
    }

    let mut consecutive = 0;
    for period in 1..=PERIODS_PER_DAY as usize {
        if busy[period] {
            consecutive += 1;
        } else {
            consecutive = 0;
        }
        if consecutive > MAX_CONSECUTIVE_LESSONS {
            penalty += LONG_RUN_PENALTY;
        }
    }

    penalty
}
