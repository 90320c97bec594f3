//! "Whenever a spell is cast" / "whenever you cast a spell" triggers.

use crate::game_state::GameState;
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

/// Fires when a spell item appears on the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct SpellCastTrigger {
    /// Only spells cast by the source's controller.
    pub you_only: bool,
}

impl SpellCastTrigger {
    pub fn any() -> Self {
        Self { you_only: false }
    }

    pub fn you() -> Self {
        Self { you_only: true }
    }
}

impl TriggerMatcher for SpellCastTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        state
            .stack
            .iter()
            .filter(|item| item.is_spell())
            .filter(|item| !self.you_only || item.controller == ctx.controller)
            .any(|item| previous.stack_item(item.id).is_none())
    }

    fn display(&self) -> String {
        if self.you_only {
            "Whenever you cast a spell".to_string()
        } else {
            "Whenever a spell is cast".to_string()
        }
    }

    fn clone_box(&self) -> Box<dyn TriggerMatcher> {
        Box::new(self.clone())
    }
}
