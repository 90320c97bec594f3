//! "At the start of your turn" trigger.

use crate::game_state::{GameState, Phase};
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

use super::entered;

#[derive(Debug, Clone, PartialEq)]
pub struct TurnStartTrigger;

impl TriggerMatcher for TurnStartTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        state.active_player == ctx.controller && entered(state, previous, Phase::Start)
    }

    fn display(&self) -> String {
        "At the start of your turn".to_string()
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
    fn test_matches_only_controllers_turn() {
        let mut previous = GameState::new("Alice", "Bob");
        let mine = previous.add_card(PlayerIndex::FIRST, Zone::Field, scholar_sprite());
        let theirs = previous.add_card(PlayerIndex::SECOND, Zone::Field, scholar_sprite());
        previous.phase = Phase::End;
        previous.active_player = PlayerIndex::SECOND;

        let mut state = previous.clone();
        state.phase = Phase::Start;
        state.active_player = PlayerIndex::FIRST;
        state.turn += 1;

        let ctx = TriggerContext::for_source(state.instance(mine).unwrap());
        assert!(TurnStartTrigger.matches(&state, &previous, &ctx));
        let ctx = TriggerContext::for_source(state.instance(theirs).unwrap());
        assert!(!TurnStartTrigger.matches(&state, &previous, &ctx));
    }

    #[test]
    fn test_no_refire_within_phase() {
        let mut state = GameState::new("Alice", "Bob");
        let mine = state.add_card(PlayerIndex::FIRST, Zone::Field, scholar_sprite());
        let ctx = TriggerContext::for_source(state.instance(mine).unwrap());
        assert!(!TurnStartTrigger.matches(&state, &state.clone(), &ctx));
    }
}
