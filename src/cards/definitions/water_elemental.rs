//! Water Elemental card definition.

use crate::card::{Card, CardBuilder};
use crate::cards::{ActivatedAbility, CardRules, static_bonus_rule};
use crate::effect::{EffectDescriptor, EffectKind, TargetRef, TargetRestriction, TargetSpec};
use crate::rules::effects::tap_and_freeze;
use crate::rules::{CardHook, RuleOutcome};
use crate::types::{CardType, Element};

/// Water Elemental
/// Familiar, Water, 3 azoth, 1/4
/// Gets +0/+1 for each azoth its controller has placed.
/// Whenever this blocks, tap and freeze the attacker.
/// 3 azoth, tap: tap and freeze target opposing Familiar.
pub fn water_elemental() -> Card {
    CardBuilder::new("water-elemental", "Water Elemental", CardType::Familiar)
        .cost(3)
        .elements(vec![Element::Water])
        .power_toughness(1, 4)
        .build()
}

pub fn water_elemental_rules() -> CardRules {
    let rules = CardRules::new(
        "water-elemental",
        "Water Elemental",
        "Grows sturdier with azoth and freezes what it touches.",
    );

    let swell = static_bonus_rule(&rules.card_id, |state, inst| {
        (0, state.player(inst.controller()).azoth_row.len() as i32)
    })
    .description("+0/+1 per azoth placed");

    let chill = rules
        .hook(CardHook::OnBlock)
        .description("freeze the blocked attacker")
        .condition(|_, ctx| matches!(ctx.target, Some(TargetRef::Card(_))))
        .apply(|state, ctx| match ctx.target {
            Some(TargetRef::Card(attacker)) => Ok(tap_and_freeze(state, attacker)),
            _ => Ok(RuleOutcome::Unchanged),
        });

    let frost = ActivatedAbility::new(
        "3 azoth, tap: tap and freeze target opposing Familiar",
        EffectDescriptor::activated(3, EffectKind::TapAndFreeze, TargetSpec::TargetFamiliar)
            .restricted_to(TargetRestriction::Opponent),
    )
    .tap();

    rules.rule(swell).rule(chill).ability(frost)
}
