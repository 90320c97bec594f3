//! Phase triggers.

mod phase_change;
mod turn_end;
mod turn_start;

pub use phase_change::PhaseChangeTrigger;
pub use turn_end::TurnEndTrigger;
pub use turn_start::TurnStartTrigger;

use crate::game_state::{GameState, Phase};

/// True if `state` has just entered `phase` (a new phase, or the same phase of a new turn).
fn entered(state: &GameState, previous: &GameState, phase: Phase) -> bool {
    state.phase == phase
        && (previous.phase != phase
            || previous.turn != state.turn
            || previous.active_player != state.active_player)
}
