//! "Whenever you activate this card's ability" trigger.

use crate::game_state::{GameState, StackItemKind};
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

#[derive(Debug, Clone, PartialEq)]
pub struct AbilityActivatedTrigger;

impl TriggerMatcher for AbilityActivatedTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        state
            .stack
            .iter()
            .filter(|item| item.kind == StackItemKind::Activated)
            .filter(|item| item.source.instance_id == ctx.source.instance_id)
            .any(|item| previous.stack_item(item.id).is_none())
    }

    fn display(&self) -> String {
        "Whenever you activate this card's ability".to_string()
    }

    fn clone_box(&self) -> Box<dyn TriggerMatcher> {
        Box::new(self.clone())
    }
}
