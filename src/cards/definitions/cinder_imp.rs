//! Cinder Imp card definition.

use crate::card::{Card, CardBuilder};
use crate::cards::{ActivatedAbility, CardRules};
use crate::effect::{EffectDescriptor, EffectKind, TargetSpec};
use crate::keywords::HASTE;
use crate::types::{CardType, Element};

/// Cinder Imp
/// Familiar, Fire Dark, 1 azoth, 1/1
/// Haste
/// 1 azoth, tap: 1 damage to any target.
pub fn cinder_imp() -> Card {
    CardBuilder::new("cinder-imp", "Cinder Imp", CardType::Familiar)
        .cost(1)
        .elements(vec![Element::Fire, Element::Dark])
        .power_toughness(1, 1)
        .keyword(HASTE)
        .build()
}

pub fn cinder_imp_rules() -> CardRules {
    CardRules::new("cinder-imp", "Cinder Imp", "A hasty pinger.").ability(
        ActivatedAbility::new(
            "1 azoth, tap: 1 damage to any target",
            EffectDescriptor::activated(1, EffectKind::Damage(1), TargetSpec::AnyTarget),
        )
        .tap(),
    )
}
