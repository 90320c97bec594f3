//! "Whenever this Familiar blocks" trigger.

use crate::game_state::GameState;
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

#[derive(Debug, Clone, PartialEq)]
pub struct ThisBlocksTrigger;

impl TriggerMatcher for ThisBlocksTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        let id = ctx.source.instance_id;
        let blocking = |s: &GameState| s.blockers.iter().any(|b| b.blocker == id);
        blocking(state) && !blocking(previous)
    }

    fn display(&self) -> String {
        "Whenever this Familiar blocks".to_string()
    }

    fn clone_box(&self) -> Box<dyn TriggerMatcher> {
        Box::new(self.clone())
    }
}
