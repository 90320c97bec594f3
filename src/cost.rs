//! Azoth cost calculation.
//!
//! The printed cost of a card is folded through every active cost modifier:
//! rules registered with a [`CostModifier`] whose condition holds, then the
//! bespoke modifier of every card on a field. The result is floored at zero.

use std::fmt;
use std::sync::Arc;

use crate::card::{Card, CardInstance};
use crate::config::EngineConfig;
use crate::game_state::GameState;
use crate::ids::PlayerIndex;
use crate::rules::{RuleBook, RuleContext};

/// What a cost modifier is asked about.
#[derive(Debug, Clone, Copy)]
pub struct CostQuery<'a> {
    /// The card being paid for.
    pub card: &'a Card,
    /// The player paying.
    pub player: PlayerIndex,
    /// The field card carrying the modifier, for card-based modifiers.
    pub source: Option<&'a CardInstance>,
}

pub type CostConditionFn = Arc<dyn Fn(&GameState, &CostQuery<'_>) -> bool>;
pub type CostApplyFn = Arc<dyn Fn(i32, &Card, PlayerIndex, &GameState) -> i32>;

/// Changes the cost of playing cards while its condition holds.
#[derive(Clone)]
pub struct CostModifier {
    pub source: String,
    condition: CostConditionFn,
    apply: CostApplyFn,
}

impl fmt::Debug for CostModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CostModifier")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl CostModifier {
    pub fn new<C, A>(source: impl Into<String>, condition: C, apply: A) -> Self
    where
        C: Fn(&GameState, &CostQuery<'_>) -> bool + 'static,
        A: Fn(i32, &Card, PlayerIndex, &GameState) -> i32 + 'static,
    {
        Self {
            source: source.into(),
            condition: Arc::new(condition),
            apply: Arc::new(apply),
        }
    }

    /// Spells and bursts played by the modifier's controller cost `amount` less.
    pub fn spell_discount(source: impl Into<String>, amount: i32) -> Self {
        Self::new(
            source,
            |_, query| {
                query.card.card_type.uses_stack()
                    && query.source.is_none_or(|s| s.controller() == query.player)
            },
            move |cost, _, _, _| cost - amount,
        )
    }

    pub fn applies(&self, state: &GameState, query: &CostQuery<'_>) -> bool {
        (self.condition)(state, query)
    }

    pub fn modify(&self, cost: i32, card: &Card, player: PlayerIndex, state: &GameState) -> i32 {
        (self.apply)(cost, card, player, state)
    }
}

/// The azoth `player` must pay to play `card` right now.
pub fn calculate_cost(
    book: &RuleBook,
    config: &EngineConfig,
    state: &GameState,
    card: &Card,
    player: PlayerIndex,
) -> u32 {
    let mut cost = i32::try_from(card.cost).unwrap_or(i32::MAX);
    let ctx = RuleContext::new(book, config).with_player(player);

    for rule in book.registry.cost_rules() {
        let Some(modifier) = rule.cost_modifier() else {
            continue;
        };
        let query = CostQuery {
            card,
            player,
            source: None,
        };
        if rule.condition(state, &ctx) && modifier.applies(state, &query) {
            cost = modifier.modify(cost, card, player, state);
        }
    }

    for source in state.field_instances() {
        let Some(modifier) = book
            .card_rules(source.card_id())
            .and_then(|rules| rules.cost_modifier.as_ref())
        else {
            continue;
        };
        let query = CostQuery {
            card,
            player,
            source: Some(source),
        };
        if modifier.applies(state, &query) {
            cost = modifier.modify(cost, card, player, state);
        }
    }

    cost.max(0) as u32
}
