//! State-based actions.
//!
//! State-based actions are checked after every installed state, inside the
//! static/state-based fixpoint. They don't use the stack and happen
//! simultaneously: every pending action is computed first, then applied.

use crate::game_state::GameState;
use crate::ids::{InstanceId, PlayerIndex};
use crate::zone::Zone;

use super::{RuleBuilder, RuleError, RuleOutcome, RuleType};

/// A state-based action that needs to be performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateBasedAction {
    /// A Familiar with zero or less toughness goes from the field to the graveyard.
    FamiliarDies(InstanceId),

    /// A player loses the game.
    PlayerLoses {
        player: PlayerIndex,
        reason: LoseReason,
    },
}

/// Reason why a player loses the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoseReason {
    /// No life cards left.
    NoLifeCards,
    /// Attempted to draw from an empty deck.
    DrewFromEmptyDeck,
}

/// Check state-based actions and return a list of actions that need to be performed.
pub fn check_state_based_actions(state: &GameState) -> Vec<StateBasedAction> {
    let mut actions = Vec::new();
    check_player_sbas(state, &mut actions);
    check_field_sbas(state, &mut actions);
    actions
}

fn check_player_sbas(state: &GameState, actions: &mut Vec<StateBasedAction>) {
    if state.is_game_over() {
        return;
    }
    for (index, player) in state.players.iter().enumerate() {
        let player_index = PlayerIndex::from_index(index as u8);
        if player.life_cards.is_empty() {
            actions.push(StateBasedAction::PlayerLoses {
                player: player_index,
                reason: LoseReason::NoLifeCards,
            });
        }
        if player.drew_from_empty_deck {
            actions.push(StateBasedAction::PlayerLoses {
                player: player_index,
                reason: LoseReason::DrewFromEmptyDeck,
            });
        }
    }
}

fn check_field_sbas(state: &GameState, actions: &mut Vec<StateBasedAction>) {
    actions.extend(
        state
            .field_instances()
            .filter(|inst| inst.card.is_familiar() && inst.toughness <= 0)
            .map(|inst| StateBasedAction::FamiliarDies(inst.instance_id)),
    );
}

/// Apply one state-based action. Returns whether anything changed.
pub fn apply_state_based_action(
    state: &mut GameState,
    action: &StateBasedAction,
) -> Result<RuleOutcome, RuleError> {
    match action {
        StateBasedAction::FamiliarDies(id) => {
            if !state.is_on_field(*id) {
                return Ok(RuleOutcome::Unchanged);
            }
            state.move_instance(*id, Zone::Graveyard)?;
            tracing::debug!(instance = %id, "familiar died from zero toughness");
            Ok(RuleOutcome::Changed)
        }
        StateBasedAction::PlayerLoses { player, reason } => {
            let declared = state.declare_winner(player.opponent());
            if declared {
                tracing::info!(%player, %reason, "player loses");
            }
            Ok(RuleOutcome::from_changed(declared))
        }
    }
}

/// Apply every pending state-based action. Returns whether anything changed.
pub fn apply_state_based_actions(state: &mut GameState) -> Result<RuleOutcome, RuleError> {
    let mut outcome = RuleOutcome::Unchanged;
    for action in check_state_based_actions(state) {
        outcome = outcome.or(apply_state_based_action(state, &action)?);
    }
    Ok(outcome)
}

fn zero_toughness(state: &GameState) -> Vec<StateBasedAction> {
    let mut actions = Vec::new();
    check_field_sbas(state, &mut actions);
    actions
}

fn player_losses(state: &GameState, reason: LoseReason) -> Vec<StateBasedAction> {
    let mut actions = Vec::new();
    check_player_sbas(state, &mut actions);
    actions.retain(|a| matches!(a, StateBasedAction::PlayerLoses { reason: r, .. } if *r == reason));
    actions
}

fn apply_all(
    state: &mut GameState,
    actions: Vec<StateBasedAction>,
) -> Result<RuleOutcome, RuleError> {
    let mut outcome = RuleOutcome::Unchanged;
    for action in &actions {
        outcome = outcome.or(apply_state_based_action(state, action)?);
    }
    Ok(outcome)
}

pub(crate) fn rules() -> Vec<RuleBuilder> {
    vec![
        RuleBuilder::new("sba_zero_toughness")
            .rule_type(RuleType::StateBased)
            .priority(10)
            .description("A Familiar with 0 or less toughness is put into the graveyard.")
            .condition(|state, _| !zero_toughness(state).is_empty())
            .apply(|state, _| {
                let actions = zero_toughness(state);
                apply_all(state, actions)
            }),
        RuleBuilder::new("sba_no_life_cards")
            .rule_type(RuleType::StateBased)
            .description("A player with no life cards left loses the game.")
            .condition(|state, _| !player_losses(state, LoseReason::NoLifeCards).is_empty())
            .apply(|state, _| {
                let actions = player_losses(state, LoseReason::NoLifeCards);
                apply_all(state, actions)
            }),
        RuleBuilder::new("sba_drew_from_empty_deck")
            .rule_type(RuleType::StateBased)
            .description("A player who drew from an empty deck loses the game.")
            .condition(|state, _| !player_losses(state, LoseReason::DrewFromEmptyDeck).is_empty())
            .apply(|state, _| {
                let actions = player_losses(state, LoseReason::DrewFromEmptyDeck);
                apply_all(state, actions)
            }),
    ]
}
