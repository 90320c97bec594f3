//! Effect resolution.
//!
//! Every [`EffectType`] has one resolution rule bound to
//! [`RuleBinding::Effect`]. Replacement rules bound to the same effect type
//! are consulted first, target by target; the first whose condition holds is
//! applied instead of the normal resolution.

use crate::action::ActionError;
use crate::card::CardInstance;
use crate::config::EngineConfig;
use crate::effect::{EffectDescriptor, EffectKind, EffectType, TargetRef, TargetSpec};
use crate::game_state::{GameState, StackItem};
use crate::ids::{InstanceId, PlayerIndex, StackItemId};
use crate::keywords;
use crate::zone::Zone;

use super::{RuleBinding, RuleBook, RuleBuilder, RuleContext, RuleError, RuleOutcome, RuleType};

/// Counter put on a Familiar damaged by a Deathtouch source.
pub const DEATHTOUCH_COUNTER: &str = "deathtouch";

/// Deals damage from `source` to a Familiar on a field or to a player.
pub fn deal_damage(
    state: &mut GameState,
    source: &CardInstance,
    target: TargetRef,
    amount: u32,
) -> RuleOutcome {
    if amount == 0 {
        return RuleOutcome::Unchanged;
    }
    match target {
        TargetRef::Card(id) => {
            if !state.is_on_field(id) {
                return RuleOutcome::Unchanged;
            }
            let Some(inst) = state.instance_mut(id) else {
                return RuleOutcome::Unchanged;
            };
            inst.take_damage(amount);
            if source.has_keyword(keywords::DEATHTOUCH) {
                inst.add_counters(DEATHTOUCH_COUNTER, 1);
            }
            tracing::debug!(source = %source.card.name, target = %id, amount, "damage to card");
            RuleOutcome::Changed
        }
        TargetRef::Player(player) => {
            let lost = state.damage_player(player, amount);
            tracing::debug!(source = %source.card.name, %player, amount, lost, "damage to player");
            RuleOutcome::from_changed(lost > 0)
        }
        TargetRef::StackItem(_) => RuleOutcome::Unchanged,
    }
}

/// Moves a card on a field to its owner's graveyard.
pub fn destroy(state: &mut GameState, id: InstanceId) -> Result<RuleOutcome, RuleError> {
    if !state.is_on_field(id) {
        return Ok(RuleOutcome::Unchanged);
    }
    state.move_instance(id, Zone::Graveyard)?;
    tracing::debug!(instance = %id, "destroyed");
    Ok(RuleOutcome::Changed)
}

/// Taps a card and keeps it from untapping during its controller's next Start phase.
pub fn tap_and_freeze(state: &mut GameState, id: InstanceId) -> RuleOutcome {
    if !state.is_on_field(id) {
        return RuleOutcome::Unchanged;
    }
    match state.instance_mut(id) {
        Some(inst) if !(inst.tapped && inst.frozen) => {
            inst.tapped = true;
            inst.frozen = true;
            RuleOutcome::Changed
        }
        _ => RuleOutcome::Unchanged,
    }
}

pub fn draw_cards(state: &mut GameState, player: PlayerIndex, count: u32) -> RuleOutcome {
    let mut outcome = RuleOutcome::Unchanged;
    for _ in 0..count {
        // Drawing from an empty deck is itself a change: it loses the game.
        state.draw_card(player);
        outcome = RuleOutcome::Changed;
    }
    outcome
}

/// Removes a spell from the stack and puts its card in its owner's graveyard.
pub fn counter_spell(state: &mut GameState, id: StackItemId) -> RuleOutcome {
    let Some(pos) = state.stack.iter().position(|item| item.id == id) else {
        return RuleOutcome::Unchanged;
    };
    let item = state.stack.remove(pos);
    tracing::debug!(stack_item = id.0, card = %item.source.card.name, "countered");
    if item.is_spell() {
        state.put_instance(item.source, Zone::Graveyard);
    }
    RuleOutcome::Changed
}

/// The targets an effect applies to at resolution.
///
/// Chosen specs use the item's still-legal chosen targets; fixed specs are
/// computed against the current state.
pub fn resolution_targets(
    state: &GameState,
    item: &StackItem,
    effect: &EffectDescriptor,
    legal_chosen: &[TargetRef],
) -> Vec<TargetRef> {
    if effect.target.is_chosen() {
        return legal_chosen.to_vec();
    }
    crate::targeting::fixed_targets(state, &item.source, item.controller, effect.target)
}

/// Resolves one effect of a stack item against its targets.
pub fn resolve_effect(
    book: &RuleBook,
    config: &EngineConfig,
    state: &mut GameState,
    item: &StackItem,
    effect: &EffectDescriptor,
    targets: &[TargetRef],
) -> Result<RuleOutcome, RuleError> {
    let effect_type = effect.effect_type();
    let base = RuleContext::new(book, config)
        .with_stack_item(item)
        .with_effect(effect);

    if targets.is_empty() {
        if effect.target != TargetSpec::None {
            tracing::debug!(stack_item = item.id.0, %effect_type, "no targets, nothing to do");
            return Ok(RuleOutcome::Unchanged);
        }
        return apply_resolution(book, state, &base, effect_type);
    }

    let mut outcome = RuleOutcome::Unchanged;
    for target in targets {
        let ctx = base.with_target(*target);
        outcome = outcome.or(apply_resolution(book, state, &ctx, effect_type)?);
    }
    Ok(outcome)
}

fn apply_resolution(
    book: &RuleBook,
    state: &mut GameState,
    ctx: &RuleContext<'_>,
    effect_type: EffectType,
) -> Result<RuleOutcome, RuleError> {
    let binding = RuleBinding::Effect(effect_type);
    let replacement = book
        .registry
        .rules_bound_of_type(&binding, RuleType::Replacement)
        .into_iter()
        .find(|rule| rule.condition(state, ctx));
    if let Some(rule) = replacement {
        tracing::debug!(rule = rule.id(), target = ?ctx.target, "replacement applies");
        return rule.apply(state, ctx);
    }

    let resolution = book
        .registry
        .rules_bound_of_type(&binding, RuleType::Resolution)
        .into_iter()
        .find(|rule| rule.condition(state, ctx));
    match resolution {
        Some(rule) => rule.apply(state, ctx),
        None => {
            tracing::warn!(%effect_type, "no resolution rule for effect");
            Ok(RuleOutcome::Unchanged)
        }
    }
}

fn resolution_rule(effect_type: EffectType) -> RuleBuilder {
    RuleBuilder::new(format!("effect_{effect_type}"))
        .rule_type(RuleType::Resolution)
        .binding(RuleBinding::Effect(effect_type))
        .condition(|_, ctx| ctx.effect.is_some() && ctx.source.is_some())
}

fn missing(rule: &str, what: &'static str) -> RuleError {
    RuleError::MissingContext {
        rule: rule.to_string(),
        what,
    }
}

/// The player a player-directed effect applies to: the target, or the controller.
fn affected_player(ctx: &RuleContext<'_>) -> Option<PlayerIndex> {
    match ctx.target {
        Some(TargetRef::Player(player)) => Some(player),
        Some(TargetRef::Card(_)) | Some(TargetRef::StackItem(_)) => None,
        None => ctx.player,
    }
}

fn target_card(ctx: &RuleContext<'_>) -> Option<InstanceId> {
    match ctx.target {
        Some(TargetRef::Card(id)) => Some(id),
        _ => None,
    }
}

/// Share of divided damage for `target`: an even split, remainder to the first target.
pub fn divided_share(total: u32, targets: &[TargetRef], target: TargetRef) -> u32 {
    if targets.is_empty() {
        return total;
    }
    let count = targets.len() as u32;
    let base = total / count;
    match targets.iter().position(|t| *t == target) {
        Some(0) => base + total % count,
        Some(_) => base,
        None => 0,
    }
}

pub(crate) fn rules() -> Vec<RuleBuilder> {
    vec![
        resolution_rule(EffectType::Draw).apply(|state, ctx| {
            let Some(EffectKind::DrawCards(count)) = ctx.effect.map(|e| &e.kind) else {
                return Err(missing("effect_draw", "a draw effect"));
            };
            Ok(affected_player(ctx)
                .map(|player| draw_cards(state, player, *count))
                .unwrap_or(RuleOutcome::Unchanged))
        }),
        resolution_rule(EffectType::Damage).apply(|state, ctx| {
            let (Some(EffectKind::Damage(amount)), Some(source), Some(target)) =
                (ctx.effect.map(|e| &e.kind), ctx.source, ctx.target)
            else {
                return Err(missing("effect_damage", "a damage effect, source and target"));
            };
            Ok(deal_damage(state, source, target, *amount))
        }),
        resolution_rule(EffectType::DamageDivided).apply(|state, ctx| {
            let (Some(EffectKind::DamageDivided(total)), Some(source), Some(target), Some(item)) = (
                ctx.effect.map(|e| &e.kind),
                ctx.source,
                ctx.target,
                ctx.stack_item,
            ) else {
                return Err(missing(
                    "effect_damage_divided",
                    "a divided damage effect, source, target and stack item",
                ));
            };
            let share = divided_share(*total, &item.targets, target);
            Ok(deal_damage(state, source, target, share))
        }),
        resolution_rule(EffectType::Destroy).apply(|state, ctx| match target_card(ctx) {
            Some(id) => destroy(state, id),
            None => Ok(RuleOutcome::Unchanged),
        }),
        resolution_rule(EffectType::Buff).apply(|state, ctx| {
            let Some(EffectKind::Buff { power, toughness }) = ctx.effect.map(|e| &e.kind) else {
                return Err(missing("effect_buff", "a buff effect"));
            };
            let Some(id) = target_card(ctx).filter(|id| state.is_on_field(*id)) else {
                return Ok(RuleOutcome::Unchanged);
            };
            match state.instance_mut(id) {
                Some(inst) => {
                    inst.add_temp_bonus(*power, *toughness);
                    Ok(RuleOutcome::Changed)
                }
                None => Ok(RuleOutcome::Unchanged),
            }
        }),
        resolution_rule(EffectType::Heal).apply(|state, ctx| {
            let Some(id) = target_card(ctx).filter(|id| state.is_on_field(*id)) else {
                return Ok(RuleOutcome::Unchanged);
            };
            Ok(RuleOutcome::from_changed(
                state.instance_mut(id).is_some_and(|inst| inst.heal()),
            ))
        }),
        resolution_rule(EffectType::RestoreLifeCard).apply(|state, ctx| {
            let Some(player) = affected_player(ctx) else {
                return Ok(RuleOutcome::Unchanged);
            };
            let restored = state.player_mut(player).restore_life_card();
            Ok(RuleOutcome::from_changed(restored.is_some()))
        }),
        resolution_rule(EffectType::TapAndFreeze).apply(|state, ctx| {
            Ok(target_card(ctx)
                .map(|id| tap_and_freeze(state, id))
                .unwrap_or(RuleOutcome::Unchanged))
        }),
        resolution_rule(EffectType::Counter).apply(|state, ctx| match ctx.target {
            Some(TargetRef::StackItem(id)) => Ok(counter_spell(state, id)),
            _ => Ok(RuleOutcome::Unchanged),
        }),
        resolution_rule(EffectType::GainAzoth).apply(|state, ctx| {
            let Some(EffectKind::GainAzoth(amount)) = ctx.effect.map(|e| &e.kind) else {
                return Err(missing("effect_gain_azoth", "a gain-azoth effect"));
            };
            let Some(player) = affected_player(ctx) else {
                return Err(RuleError::Action(ActionError::Rejected(
                    "azoth can only go to a player".into(),
                )));
            };
            state.player_mut(player).azoth_available += amount;
            Ok(RuleOutcome::from_changed(*amount > 0))
        }),
    ]
}
