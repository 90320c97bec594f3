//! Target computation functions.
//!
//! This module provides functions for computing legal targets
//! for spells and abilities.

use crate::action::ActionError;
use crate::card::CardInstance;
use crate::config::EngineConfig;
use crate::effect::{TargetRef, TargetRestriction, TargetSpec};
use crate::game_state::GameState;
use crate::ids::PlayerIndex;
use crate::rules::{KeywordHook, RuleBook, RuleContext};
use crate::zone::Zone;

use super::types::{TargetRequest, TargetingInvalidReason, TargetingResult};

fn restriction_allows(restriction: TargetRestriction, controller: PlayerIndex, owner: PlayerIndex) -> bool {
    match restriction {
        TargetRestriction::Any => true,
        TargetRestriction::Own => controller == owner,
        TargetRestriction::Opponent => controller != owner,
    }
}

/// Check if a request can target a specific card.
///
/// Checks, in order:
/// - the ability's own/opponent restriction
/// - keyword targeting rules of the target (protection, hexproof, shroud)
/// - the ability's bespoke predicate
pub fn can_target_card(
    book: &RuleBook,
    config: &EngineConfig,
    state: &GameState,
    request: &TargetRequest<'_>,
    target: &CardInstance,
) -> TargetingResult {
    if !matches!(request.spec, TargetSpec::TargetFamiliar | TargetSpec::AnyTarget)
        || !target.card.is_familiar()
    {
        return TargetingResult::Invalid(TargetingInvalidReason::DoesntMatchFilter);
    }

    if !restriction_allows(request.restriction, request.controller, target.controller()) {
        return TargetingResult::Invalid(TargetingInvalidReason::WrongController);
    }

    let target_ref = TargetRef::Card(target.instance_id);
    let ctx = RuleContext::new(book, config)
        .with_source(request.source)
        .with_player(request.controller)
        .with_target(target_ref);
    for rule in book.registry.keyword_rules_for(KeywordHook::Targeting, target) {
        if let Some(ActionError::IllegalTarget { reason, .. }) = rule.rejection(state, &ctx) {
            return TargetingResult::Invalid(reason);
        }
        if !rule.condition(state, &ctx) {
            return TargetingResult::Invalid(TargetingInvalidReason::PredicateFailed);
        }
    }

    if let Some(predicate) = request.can_target
        && !predicate(state, target)
    {
        return TargetingResult::Invalid(TargetingInvalidReason::PredicateFailed);
    }

    TargetingResult::Legal
}

/// Check any target reference against a request.
pub fn check_target(
    book: &RuleBook,
    config: &EngineConfig,
    state: &GameState,
    request: &TargetRequest<'_>,
    target: TargetRef,
) -> TargetingResult {
    match target {
        TargetRef::Card(id) => {
            let Some((zone, card)) = state.find_instance(id) else {
                return TargetingResult::Invalid(TargetingInvalidReason::DoesntExist);
            };
            if zone != Zone::Field {
                return TargetingResult::Invalid(TargetingInvalidReason::NotOnField);
            }
            can_target_card(book, config, state, request, card)
        }
        TargetRef::Player(player) => {
            if !matches!(request.spec, TargetSpec::TargetPlayer | TargetSpec::AnyTarget) {
                return TargetingResult::Invalid(TargetingInvalidReason::DoesntMatchFilter);
            }
            if !player.is_seated() {
                return TargetingResult::Invalid(TargetingInvalidReason::DoesntExist);
            }
            if !restriction_allows(request.restriction, request.controller, player) {
                return TargetingResult::Invalid(TargetingInvalidReason::WrongController);
            }
            TargetingResult::Legal
        }
        TargetRef::StackItem(id) => {
            if request.spec != TargetSpec::TargetStackSpell {
                return TargetingResult::Invalid(TargetingInvalidReason::DoesntMatchFilter);
            }
            let Some(item) = state.stack_item(id) else {
                return TargetingResult::Invalid(TargetingInvalidReason::DoesntExist);
            };
            if !item.is_spell() {
                return TargetingResult::Invalid(TargetingInvalidReason::DoesntMatchFilter);
            }
            if !restriction_allows(request.restriction, request.controller, item.controller) {
                return TargetingResult::Invalid(TargetingInvalidReason::WrongController);
            }
            TargetingResult::Legal
        }
    }
}

pub fn is_valid_target(
    book: &RuleBook,
    config: &EngineConfig,
    state: &GameState,
    request: &TargetRequest<'_>,
    target: TargetRef,
) -> bool {
    check_target(book, config, state, request, target).is_legal()
}

/// Every legal target for a request, opposing side first.
///
/// Fixed specs (controller, each opposing Familiar, ...) have no choices and
/// return nothing; see [`fixed_targets`].
pub fn legal_targets(
    book: &RuleBook,
    config: &EngineConfig,
    state: &GameState,
    request: &TargetRequest<'_>,
) -> Vec<TargetRef> {
    let opponent = request.controller.opponent();
    let sides = [opponent, request.controller];
    let familiars = sides.iter().flat_map(|p| {
        state
            .player(*p)
            .field
            .iter()
            .map(|inst| TargetRef::Card(inst.instance_id))
    });
    let players = sides.iter().map(|p| TargetRef::Player(*p));

    let candidates: Vec<TargetRef> = match request.spec {
        TargetSpec::TargetFamiliar => familiars.collect(),
        TargetSpec::TargetPlayer => players.collect(),
        TargetSpec::AnyTarget => familiars.chain(players).collect(),
        TargetSpec::TargetStackSpell => state
            .stack
            .iter()
            .rev()
            .map(|item| TargetRef::StackItem(item.id))
            .collect(),
        _ => Vec::new(),
    };

    candidates
        .into_iter()
        .filter(|t| is_valid_target(book, config, state, request, *t))
        .collect()
}

/// Checks a chosen target list: present, distinct, within `max_targets` and legal.
pub fn validate_targets(
    book: &RuleBook,
    config: &EngineConfig,
    state: &GameState,
    request: &TargetRequest<'_>,
    targets: &[TargetRef],
    max_targets: usize,
) -> Result<(), ActionError> {
    if !request.spec.is_chosen() {
        if targets.is_empty() {
            return Ok(());
        }
        return Err(ActionError::TooManyTargets { max: 0 });
    }
    if targets.is_empty() {
        return Err(ActionError::MissingTarget);
    }
    if targets.len() > max_targets {
        return Err(ActionError::TooManyTargets { max: max_targets });
    }
    if let Some(repeated) = targets
        .iter()
        .enumerate()
        .find_map(|(i, t)| targets[..i].contains(t).then_some(*t))
    {
        return Err(ActionError::DuplicateTarget(repeated));
    }
    for target in targets {
        if let TargetingResult::Invalid(reason) = check_target(book, config, state, request, *target) {
            return Err(ActionError::IllegalTarget {
                target: *target,
                reason,
            });
        }
    }
    Ok(())
}

/// Targets that are still legal, for re-checking at resolution.
pub fn still_legal_targets(
    book: &RuleBook,
    config: &EngineConfig,
    state: &GameState,
    request: &TargetRequest<'_>,
    targets: &[TargetRef],
) -> Vec<TargetRef> {
    targets
        .iter()
        .copied()
        .filter(|t| is_valid_target(book, config, state, request, *t))
        .collect()
}

/// Targets determined by the rules rather than chosen.
pub fn fixed_targets(
    state: &GameState,
    source: &CardInstance,
    controller: PlayerIndex,
    spec: TargetSpec,
) -> Vec<TargetRef> {
    let familiars_of = |player: PlayerIndex| -> Vec<TargetRef> {
        state
            .player(player)
            .field
            .iter()
            .filter(|inst| inst.card.is_familiar())
            .map(|inst| TargetRef::Card(inst.instance_id))
            .collect()
    };
    match spec {
        TargetSpec::SelfCard => vec![TargetRef::Card(source.instance_id)],
        TargetSpec::Controller => vec![TargetRef::Player(controller)],
        TargetSpec::Opponent => vec![TargetRef::Player(controller.opponent())],
        TargetSpec::EachOpposingFamiliar => familiars_of(controller.opponent()),
        TargetSpec::EachOwnFamiliar => familiars_of(controller),
        TargetSpec::None
        | TargetSpec::TargetFamiliar
        | TargetSpec::TargetPlayer
        | TargetSpec::AnyTarget
        | TargetSpec::TargetStackSpell => Vec::new(),
    }
}
