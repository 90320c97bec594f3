//! "At the end of your turn" trigger.

use crate::game_state::{GameState, Phase};
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

use super::entered;

#[derive(Debug, Clone, PartialEq)]
pub struct TurnEndTrigger;

impl TriggerMatcher for TurnEndTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        state.active_player == ctx.controller && entered(state, previous, Phase::End)
    }

    fn display(&self) -> String {
        "At the end of your turn".to_string()
    }

    fn clone_box(&self) -> Box<dyn TriggerMatcher> {
        Box::new(self.clone())
    }
}
