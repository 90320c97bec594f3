//! Building a starting game from two deck lists.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::card::Card;
use crate::config::EngineConfig;
use crate::game_state::GameState;
use crate::ids::PlayerIndex;
use crate::zone::Zone;

/// Deals a new game: shuffles each deck with a seeded RNG, then deals life
/// cards and an opening hand from the top of each deck.
///
/// The same seed and decks always give the same game.
#[derive(Debug, Clone)]
pub struct GameSetup {
    names: [String; 2],
    decks: [Vec<Card>; 2],
    seed: u64,
}

impl GameSetup {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            names: [first.into(), second.into()],
            decks: [Vec::new(), Vec::new()],
            seed: 0,
        }
    }

    pub fn deck(mut self, player: PlayerIndex, cards: Vec<Card>) -> Self {
        if let Some(deck) = self.decks.get_mut(player.index()) {
            *deck = cards;
        }
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self, config: &EngineConfig) -> GameState {
        let [first, second] = self.names;
        let mut state = GameState::new(first, second);
        let mut rng = StdRng::seed_from_u64(self.seed);

        for (index, cards) in self.decks.into_iter().enumerate() {
            let player = PlayerIndex::from_index(index as u8);
            for card in cards {
                state.add_card(player, Zone::Deck, card);
            }
            state.player_mut(player).deck.shuffle(&mut rng);

            let dealt = state.player_mut(player);
            for _ in 0..config.starting_life_cards {
                let Some(card) = dealt.deck.pop() else { break };
                dealt.life_cards.push(card);
            }
            for _ in 0..config.opening_hand_size {
                let Some(card) = dealt.deck.pop() else { break };
                dealt.hand.push(card);
            }
            tracing::debug!(
                %player,
                deck = dealt.deck.len(),
                life_cards = dealt.life_cards.len(),
                hand = dealt.hand.len(),
                "dealt opening cards"
            );
        }
        state
    }
}
