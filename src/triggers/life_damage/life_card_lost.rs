//! "Whenever you lose a life card" / "whenever an opponent loses a life card" triggers.

use crate::game_state::GameState;
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

/// Fires when the watched player's life card count drops.
#[derive(Debug, Clone, PartialEq)]
pub struct LifeCardLostTrigger {
    /// Watch the controller's opponent instead of the controller.
    pub opponent: bool,
}

impl LifeCardLostTrigger {
    pub fn you() -> Self {
        Self { opponent: false }
    }

    pub fn opponent() -> Self {
        Self { opponent: true }
    }
}

impl TriggerMatcher for LifeCardLostTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        let watched = if self.opponent {
            ctx.controller.opponent()
        } else {
            ctx.controller
        };
        state.player(watched).life_cards.len() < previous.player(watched).life_cards.len()
    }

    fn display(&self) -> String {
        if self.opponent {
            "Whenever an opponent loses a life card".to_string()
        } else {
            "Whenever you lose a life card".to_string()
        }
    }

    fn clone_box(&self) -> Box<dyn TriggerMatcher> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::definitions::scholar_sprite;
    use crate::ids::PlayerIndex;
    use crate::zone::Zone;

    #[test]
    fn test_watches_the_right_player() {
        let mut previous = GameState::new("Alice", "Bob");
        let id = previous.add_card(PlayerIndex::FIRST, Zone::Field, scholar_sprite());
        previous.add_card(PlayerIndex::SECOND, Zone::LifeCards, scholar_sprite());
        let mut state = previous.clone();
        state.damage_player(PlayerIndex::SECOND, 1);

        let ctx = TriggerContext::for_source(state.instance(id).unwrap());
        assert!(LifeCardLostTrigger::opponent().matches(&state, &previous, &ctx));
        assert!(!LifeCardLostTrigger::you().matches(&state, &previous, &ctx));
    }
}
