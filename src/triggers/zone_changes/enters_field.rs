//! "When this enters the field" trigger.

use crate::game_state::GameState;
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

/// Fires when the source is in play now and was not before.
///
/// Flags count as in play, so a flag's own enter trigger fires too.
#[derive(Debug, Clone, PartialEq)]
pub struct EntersFieldTrigger;

impl TriggerMatcher for EntersFieldTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        let id = ctx.source.instance_id;
        let now = state.find_instance(id).is_some_and(|(zone, _)| zone.is_in_play());
        let before = previous
            .find_instance(id)
            .is_some_and(|(zone, _)| zone.is_in_play());
        now && !before
    }

    fn display(&self) -> String {
        "When this enters the field".to_string()
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
    fn test_matches_when_played_from_hand() {
        let mut previous = GameState::new("Alice", "Bob");
        let id = previous.add_card(PlayerIndex::FIRST, Zone::Hand, scholar_sprite());
        let mut state = previous.clone();
        state.move_instance(id, Zone::Field).unwrap();

        let source = state.instance(id).unwrap();
        let ctx = TriggerContext::for_source(source);
        assert!(EntersFieldTrigger.matches(&state, &previous, &ctx));
    }

    #[test]
    fn test_does_not_match_when_already_in_play() {
        let mut state = GameState::new("Alice", "Bob");
        let id = state.add_card(PlayerIndex::FIRST, Zone::Field, scholar_sprite());
        let previous = state.clone();
        let source = state.instance(id).unwrap();
        let ctx = TriggerContext::for_source(source);
        assert!(!EntersFieldTrigger.matches(&state, &previous, &ctx));
    }

    #[test]
    fn test_display() {
        assert!(EntersFieldTrigger.display().contains("enters"));
    }
}
