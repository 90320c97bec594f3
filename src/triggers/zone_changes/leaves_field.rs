//! "Whenever another Familiar you control leaves the field" trigger.

use crate::game_state::GameState;
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

#[derive(Debug, Clone, PartialEq)]
pub struct AllyLeavesFieldTrigger;

impl TriggerMatcher for AllyLeavesFieldTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        previous
            .player(ctx.controller)
            .field
            .iter()
            .filter(|inst| inst.instance_id != ctx.source.instance_id)
            .filter(|inst| inst.card.is_familiar())
            .any(|inst| !state.is_on_field(inst.instance_id))
    }

    fn display(&self) -> String {
        "Whenever another Familiar you control leaves the field".to_string()
    }

    fn clone_box(&self) -> Box<dyn TriggerMatcher> {
        Box::new(self.clone())
    }
}
