//! "Whenever a phase begins" trigger.

use crate::game_state::GameState;
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

use super::entered;

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseChangeTrigger;

impl TriggerMatcher for PhaseChangeTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, _ctx: &TriggerContext) -> bool {
        entered(state, previous, state.phase)
    }

    fn display(&self) -> String {
        "Whenever a phase begins".to_string()
    }

    fn clone_box(&self) -> Box<dyn TriggerMatcher> {
        Box::new(self.clone())
    }
}
