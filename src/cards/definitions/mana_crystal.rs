//! Mana Crystal card definition.

use crate::card::{Card, CardBuilder};
use crate::types::CardType;

/// Mana Crystal
/// Azoth
/// Produces 2 azoth.
pub fn mana_crystal() -> Card {
    CardBuilder::new("mana-crystal", "Mana Crystal", CardType::Azoth)
        .cost(0)
        .azoth_value(2)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::GameState;
    use crate::ids::PlayerIndex;
    use crate::zone::Zone;

    #[test]
    fn test_produces_two() {
        let mut state = GameState::new("Alice", "Bob");
        state.add_card(PlayerIndex::FIRST, Zone::AzothRow, mana_crystal());
        assert_eq!(state.player(PlayerIndex::FIRST).azoth_production(), 2);
    }
}
