//! Turn structure: what happens when the game enters a phase.
//!
//! Each rule is bound to [`RuleBinding::PhaseEntry`] and runs, in priority
//! order, when a `change_phase` action moves the game into that phase.

use crate::game_state::{GameState, Phase};
use crate::ids::PlayerIndex;

use super::effects::draw_cards;
use super::{RuleBinding, RuleBuilder, RuleContext, RuleOutcome, RuleType};

fn phase_rule(id: &str, phase: Phase) -> RuleBuilder {
    RuleBuilder::new(id)
        .rule_type(RuleType::TurnStructure)
        .binding(RuleBinding::PhaseEntry(phase))
}

/// Untaps the active player's permanents, thaws frozen ones instead of
/// untapping them, ends summoning sickness and resets azoth.
pub fn untap_step(state: &mut GameState) -> RuleOutcome {
    let active = state.active_player;
    let player = state.player_mut(active);
    for inst in player.field.iter_mut().chain(player.azoth_row.iter_mut()) {
        if inst.frozen {
            inst.frozen = false;
        } else {
            inst.tapped = false;
        }
    }
    for inst in player.field.iter_mut() {
        inst.summoning_sickness = false;
    }
    player.begin_turn();
    tracing::debug!(
        player = %active,
        azoth = player.azoth_available,
        "untap step"
    );
    RuleOutcome::Changed
}

/// Whether the active player skips the Start-phase draw.
fn skips_draw(state: &GameState, ctx: &RuleContext<'_>) -> bool {
    ctx.config.first_player_skips_draw
        && state.turn == 1
        && state.active_player == PlayerIndex::FIRST
}

fn has_temp_bonus(state: &GameState) -> bool {
    state
        .field_instances()
        .any(|inst| inst.temp_power != 0 || inst.temp_toughness != 0)
}

pub(crate) fn rules() -> Vec<RuleBuilder> {
    vec![
        phase_rule("start_untap", Phase::Start)
            .priority(20)
            .description("Untap, end summoning sickness and reset azoth.")
            .condition(|_, _| true)
            .apply(|state, _| Ok(untap_step(state))),
        phase_rule("start_draw", Phase::Start)
            .priority(10)
            .description("The active player draws a card.")
            .condition(|state, ctx| !skips_draw(state, ctx))
            .apply(|state, _| {
                let active = state.active_player;
                Ok(draw_cards(state, active, 1))
            }),
        phase_rule("end_of_combat", Phase::PostCombat)
            .description("Attackers and blockers leave combat.")
            .condition(|state, _| !state.attackers.is_empty() || !state.blockers.is_empty())
            .apply(|state, _| {
                state.attackers.clear();
                state.blockers.clear();
                Ok(RuleOutcome::Changed)
            }),
        phase_rule("end_cleanup", Phase::End)
            .description("Until-end-of-turn bonuses expire.")
            .condition(|state, _| has_temp_bonus(state))
            .apply(|state, _| {
                let mut outcome = RuleOutcome::Unchanged;
                for player in state.players.iter_mut() {
                    for inst in player.field.iter_mut() {
                        outcome = outcome.or(RuleOutcome::from_changed(inst.expire_temp_bonus()));
                    }
                }
                Ok(outcome)
            }),
    ]
}
