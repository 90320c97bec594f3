//! "Whenever this Familiar attacks" trigger.

use crate::game_state::GameState;
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

/// Fires when the source is newly declared as an attacker.
#[derive(Debug, Clone, PartialEq)]
pub struct ThisAttacksTrigger;

impl TriggerMatcher for ThisAttacksTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        let id = ctx.source.instance_id;
        state.attackers.contains(&id) && !previous.attackers.contains(&id)
    }

    fn display(&self) -> String {
        "Whenever this Familiar attacks".to_string()
    }

    fn clone_box(&self) -> Box<dyn TriggerMatcher> {
        Box::new(self.clone())
    }
}
