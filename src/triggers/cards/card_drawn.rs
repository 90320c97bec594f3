//! "Whenever you draw a card" trigger.

use crate::game_state::GameState;
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

/// Fires when the controller's draw count went up.
#[derive(Debug, Clone, PartialEq)]
pub struct CardDrawnTrigger;

impl TriggerMatcher for CardDrawnTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        state.player(ctx.controller).cards_drawn > previous.player(ctx.controller).cards_drawn
    }

    fn display(&self) -> String {
        "Whenever you draw a card".to_string()
    }

    fn clone_box(&self) -> Box<dyn TriggerMatcher> {
        Box::new(self.clone())
    }
}
