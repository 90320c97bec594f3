//! Combat: declaring attackers and blockers, and combat damage.
//!
//! Attacks and blocks are actions with their own validation and action
//! rules. Combat damage is dealt when the game enters the PostCombat phase.
//! Evasion and restrictions are keyword rules; this module only asks the
//! registry for them.

use std::collections::BTreeSet;

use crate::action::{Action, ActionError, ActionKind};
use crate::card::CardInstance;
use crate::config::EngineConfig;
use crate::effect::TargetRef;
use crate::game_state::{BlockAssignment, GameState, Phase};
use crate::ids::{InstanceId, PlayerIndex};
use crate::keywords::{DEATHTOUCH, HASTE, TRAMPLE};

use super::effects::deal_damage;
use super::{
    CardHook, KeywordHook, RuleBinding, RuleBook, RuleBuilder, RuleContext, RuleError,
    RuleOutcome, RuleType, apply_holding, first_rejection,
};

/// Check if a Familiar can be declared as an attacker.
///
/// Tapped Familiars can't attack, summoning sickness prevents attacking
/// unless the Familiar has Haste, and keyword attack restrictions (Defender)
/// apply.
pub fn can_attack(
    book: &RuleBook,
    config: &EngineConfig,
    state: &GameState,
    attacker: &CardInstance,
) -> Result<(), ActionError> {
    let refuse = |reason: &str| ActionError::CannotAttack {
        card: attacker.instance_id,
        reason: reason.to_string(),
    };
    if !attacker.card.is_familiar() {
        return Err(refuse("not a familiar"));
    }
    if attacker.tapped {
        return Err(refuse("tapped"));
    }
    if attacker.summoning_sickness && !attacker.has_keyword(HASTE) {
        return Err(refuse("summoning sickness"));
    }
    let ctx = RuleContext::new(book, config).with_source(attacker);
    let restrictions = book
        .registry
        .keyword_rules_for(KeywordHook::AttackRestriction, attacker);
    match first_rejection(&restrictions, state, &ctx) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Check if `blocker` can block `attacker`.
///
/// The blocker must be an untapped Familiar; block restrictions of both
/// cards' keywords (Flying, Unblockable, Shadow) apply.
pub fn can_block(
    book: &RuleBook,
    config: &EngineConfig,
    state: &GameState,
    attacker: &CardInstance,
    blocker: &CardInstance,
) -> Result<(), ActionError> {
    let refuse = |reason: &str| ActionError::CannotBlock {
        blocker: blocker.instance_id,
        attacker: attacker.instance_id,
        reason: reason.to_string(),
    };
    if !blocker.card.is_familiar() {
        return Err(refuse("not a familiar"));
    }
    if blocker.tapped {
        return Err(refuse("tapped"));
    }
    let ctx = RuleContext::new(book, config)
        .with_source(blocker)
        .with_target(TargetRef::Card(attacker.instance_id));
    let mut restrictions = book
        .registry
        .keyword_rules_for(KeywordHook::BlockRestriction, attacker);
    for rule in book
        .registry
        .keyword_rules_for(KeywordHook::BlockRestriction, blocker)
    {
        if !restrictions.iter().any(|r| r.id() == rule.id()) {
            restrictions.push(rule);
        }
    }
    match first_rejection(&restrictions, state, &ctx) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn field_card(
    state: &GameState,
    player: PlayerIndex,
    id: InstanceId,
) -> Result<&CardInstance, ActionError> {
    state
        .player(player)
        .field
        .iter()
        .find(|inst| inst.instance_id == id)
        .ok_or(ActionError::CardNotOnField(id))
}

fn validate_attack(
    state: &GameState,
    ctx: &RuleContext<'_>,
) -> Result<(), ActionError> {
    let Some(Action::Attack { player, attackers }) = ctx.action else {
        return Err(ActionError::Rejected("not an attack".into()));
    };
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    if state.phase != Phase::Combat {
        return Err(ActionError::WrongPhase {
            kind: ActionKind::Attack,
            phase: state.phase,
        });
    }
    if *player != state.active_player {
        return Err(ActionError::NotActivePlayer(*player));
    }
    if !state.stack.is_empty() {
        return Err(ActionError::StackNotEmpty);
    }
    if !state.attackers.is_empty() {
        return Err(ActionError::Rejected("attackers were already declared".into()));
    }
    if attackers.is_empty() {
        return Err(ActionError::Rejected("no attackers declared".into()));
    }
    let distinct: BTreeSet<_> = attackers.iter().collect();
    if distinct.len() != attackers.len() {
        return Err(ActionError::Rejected("an attacker was declared twice".into()));
    }
    for id in attackers {
        let attacker = field_card(state, *player, *id)?;
        can_attack(ctx.book, ctx.config, state, attacker)?;
    }
    Ok(())
}

fn declare_attack(state: &mut GameState, ctx: &RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
    let Some(Action::Attack { attackers, .. }) = ctx.action else {
        return Err(RuleError::MissingContext {
            rule: "action_attack".into(),
            what: "an attack action",
        });
    };
    for id in attackers {
        if let Some(inst) = state.instance_mut(*id) {
            inst.tapped = true;
        }
    }
    state.attackers = attackers.clone();
    tracing::debug!(attackers = attackers.len(), "attackers declared");

    for id in attackers {
        let Some(attacker) = state.instance(*id).cloned() else {
            continue;
        };
        let hook_ctx = ctx.with_source(&attacker);
        let keyword_rules = ctx
            .book
            .registry
            .keyword_rules_for(KeywordHook::OnAttack, &attacker);
        apply_holding(&keyword_rules, state, &hook_ctx)?;
        let card_rules = ctx.book.registry.rules_bound(&RuleBinding::Card {
            card: attacker.card_id().clone(),
            hook: CardHook::OnAttack,
        });
        apply_holding(&card_rules, state, &hook_ctx)?;
    }
    Ok(RuleOutcome::Changed)
}

fn validate_block(state: &GameState, ctx: &RuleContext<'_>) -> Result<(), ActionError> {
    let Some(Action::Block { player, blocks }) = ctx.action else {
        return Err(ActionError::Rejected("not a block".into()));
    };
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    if state.phase != Phase::Combat || state.attackers.is_empty() {
        return Err(ActionError::WrongPhase {
            kind: ActionKind::Block,
            phase: state.phase,
        });
    }
    if *player != state.active_player.opponent() {
        return Err(ActionError::NotDefendingPlayer(*player));
    }
    if !state.stack.is_empty() {
        return Err(ActionError::StackNotEmpty);
    }
    if !state.blockers.is_empty() {
        return Err(ActionError::Rejected("blockers were already declared".into()));
    }
    let mut seen_attackers = BTreeSet::new();
    let mut seen_blockers = BTreeSet::new();
    for BlockAssignment { attacker, blocker } in blocks {
        if !state.attackers.contains(attacker) {
            return Err(ActionError::Rejected(format!("{attacker} is not attacking")));
        }
        if !seen_attackers.insert(*attacker) {
            return Err(ActionError::Rejected(format!("{attacker} is blocked twice")));
        }
        if !seen_blockers.insert(*blocker) {
            return Err(ActionError::Rejected(format!("{blocker} blocks twice")));
        }
        let blocking = field_card(state, *player, *blocker)?;
        let attacking = field_card(state, state.active_player, *attacker)?;
        can_block(ctx.book, ctx.config, state, attacking, blocking)?;
    }
    Ok(())
}

fn declare_block(state: &mut GameState, ctx: &RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
    let Some(Action::Block { blocks, .. }) = ctx.action else {
        return Err(RuleError::MissingContext {
            rule: "action_block".into(),
            what: "a block action",
        });
    };
    state.blockers = blocks.clone();
    tracing::debug!(blocks = blocks.len(), "blockers declared");

    for block in blocks {
        let (Some(attacker), Some(blocker)) = (
            state.instance(block.attacker).cloned(),
            state.instance(block.blocker).cloned(),
        ) else {
            continue;
        };

        let blocker_ctx = ctx
            .with_source(&blocker)
            .with_target(TargetRef::Card(attacker.instance_id));
        let card_rules = ctx.book.registry.rules_bound(&RuleBinding::Card {
            card: blocker.card_id().clone(),
            hook: CardHook::OnBlock,
        });
        apply_holding(&card_rules, state, &blocker_ctx)?;

        let attacker_ctx = ctx
            .with_player(attacker.controller())
            .with_source(&attacker)
            .with_target(TargetRef::Card(blocker.instance_id));
        let keyword_rules = ctx
            .book
            .registry
            .keyword_rules_for(KeywordHook::OnBlocked, &attacker);
        apply_holding(&keyword_rules, state, &attacker_ctx)?;
    }
    Ok(RuleOutcome::from_changed(!blocks.is_empty()))
}

/// Damage an attacker with `power` tramples over a blocker.
///
/// Returns 0 if the attacker doesn't have Trample. With Deathtouch one point
/// is lethal.
pub fn trample_excess(attacker: &CardInstance, blocker: &CardInstance, power: u32) -> u32 {
    if !attacker.has_keyword(TRAMPLE) {
        return 0;
    }
    let lethal = if attacker.has_keyword(DEATHTOUCH) {
        1
    } else {
        blocker.toughness.max(0) as u32
    };
    power.saturating_sub(lethal)
}

fn combat_power(inst: &CardInstance) -> u32 {
    inst.power.max(0) as u32
}

/// Deals combat damage for every declared attacker, simultaneously.
///
/// Blocked attackers and their blockers damage each other; Trample excess
/// goes to the defending player. Unblocked attackers remove the defending
/// player's life cards.
pub fn deal_combat_damage(state: &mut GameState) -> RuleOutcome {
    let defender = state.active_player.opponent();
    let mut hits: Vec<(CardInstance, TargetRef, u32)> = Vec::new();

    for id in &state.attackers {
        let Some(attacker) = state.instance(*id).filter(|_| state.is_on_field(*id)) else {
            continue;
        };
        let power = combat_power(attacker);
        let blocker = state
            .blockers
            .iter()
            .find(|b| b.attacker == *id)
            .and_then(|b| state.instance(b.blocker))
            .filter(|b| state.is_on_field(b.instance_id));

        match blocker {
            Some(blocker) => {
                let excess = trample_excess(attacker, blocker, power);
                hits.push((
                    attacker.clone(),
                    TargetRef::Card(blocker.instance_id),
                    power - excess,
                ));
                if excess > 0 {
                    hits.push((attacker.clone(), TargetRef::Player(defender), excess));
                }
                hits.push((
                    blocker.clone(),
                    TargetRef::Card(attacker.instance_id),
                    combat_power(blocker),
                ));
            }
            None => hits.push((attacker.clone(), TargetRef::Player(defender), power)),
        }
    }

    hits.into_iter()
        .fold(RuleOutcome::Unchanged, |outcome, (source, target, amount)| {
            outcome.or(deal_damage(state, &source, target, amount))
        })
}

pub(crate) fn rules() -> Vec<RuleBuilder> {
    vec![
        RuleBuilder::new("validate_attack")
            .rule_type(RuleType::TurnStructure)
            .binding(RuleBinding::Validate(ActionKind::Attack))
            .validator(validate_attack),
        RuleBuilder::new("action_attack")
            .rule_type(RuleType::TurnStructure)
            .binding(RuleBinding::Action(ActionKind::Attack))
            .condition(|_, ctx| matches!(ctx.action, Some(Action::Attack { .. })))
            .apply(declare_attack),
        RuleBuilder::new("validate_block")
            .rule_type(RuleType::TurnStructure)
            .binding(RuleBinding::Validate(ActionKind::Block))
            .validator(validate_block),
        RuleBuilder::new("action_block")
            .rule_type(RuleType::TurnStructure)
            .binding(RuleBinding::Action(ActionKind::Block))
            .condition(|_, ctx| matches!(ctx.action, Some(Action::Block { .. })))
            .apply(declare_block),
        RuleBuilder::new("combat_damage")
            .rule_type(RuleType::TurnStructure)
            .binding(RuleBinding::PhaseEntry(Phase::PostCombat))
            .priority(10)
            .description("Attackers and blockers deal combat damage.")
            .condition(|state, _| !state.attackers.is_empty())
            .apply(|state, _| Ok(deal_combat_damage(state))),
    ]
}
