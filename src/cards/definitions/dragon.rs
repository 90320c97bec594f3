//! Dragon card definition.

use crate::card::{Card, CardBuilder};
use crate::cards::{ActivatedAbility, CardRules, field_copies};
use crate::effect::{EffectDescriptor, EffectKind, TargetSpec};
use crate::keywords::FLYING;
use crate::rules::{CardHook, RuleOutcome};
use crate::types::{CardType, Element};

/// Dragon
/// Familiar, Fire Air, 5 azoth, 4/4
/// Has Flying.
/// When this enters the field, it deals 2 damage to each opposing Familiar.
/// 2 azoth: 3 damage divided among up to three targets.
pub fn dragon() -> Card {
    CardBuilder::new("dragon", "Dragon", CardType::Familiar)
        .cost(5)
        .elements(vec![Element::Fire, Element::Air])
        .power_toughness(4, 4)
        .effect(EffectDescriptor::triggered(
            "enter_field",
            EffectKind::Damage(2),
            TargetSpec::EachOpposingFamiliar,
        ))
        .build()
}

pub fn dragon_rules() -> CardRules {
    let rules = CardRules::new("dragon", "Dragon", "Flies, breathes fire on arrival.");

    let card = rules.card_id.clone();
    let check = card.clone();
    let wings = rules
        .hook(CardHook::Static)
        .description("has Flying")
        .condition(move |state, _| {
            field_copies(state, &check)
                .into_iter()
                .any(|id| state.instance(id).is_some_and(|d| !d.has_keyword(FLYING)))
        })
        .apply(move |state, _| {
            let mut outcome = RuleOutcome::Unchanged;
            for id in field_copies(state, &card) {
                if let Some(dragon) = state.instance_mut(id) {
                    outcome = outcome.or(RuleOutcome::from_changed(dragon.grant_keyword(FLYING)));
                }
            }
            Ok(outcome)
        });

    let breath = ActivatedAbility::new(
        "2 azoth: 3 damage divided among up to three targets",
        EffectDescriptor::activated(2, EffectKind::DamageDivided(3), TargetSpec::AnyTarget),
    )
    .max_targets(3);

    rules.rule(wings).ability(breath)
}
