//! "Whenever you place an azoth" trigger.

use crate::game_state::GameState;
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

#[derive(Debug, Clone, PartialEq)]
pub struct AzothPlacedTrigger;

impl TriggerMatcher for AzothPlacedTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        state.player(ctx.controller).azoth_row.len() > previous.player(ctx.controller).azoth_row.len()
    }

    fn display(&self) -> String {
        "Whenever you place an azoth".to_string()
    }

    fn clone_box(&self) -> Box<dyn TriggerMatcher> {
        Box::new(self.clone())
    }
}
