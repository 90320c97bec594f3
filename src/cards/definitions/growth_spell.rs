//! Growth Spell card definition.

use crate::card::{Card, CardBuilder};
use crate::effect::{EffectDescriptor, EffectKind, TargetRestriction, TargetSpec};
use crate::types::{CardType, Element};

/// Growth Spell
/// Burst, Earth, 1 azoth
/// Target Familiar you control gets +2/+2 until end of turn.
pub fn growth_spell() -> Card {
    CardBuilder::new("growth-spell", "Growth Spell", CardType::Burst)
        .cost(1)
        .elements(vec![Element::Earth])
        .effect(
            EffectDescriptor::on_play(
                EffectKind::Buff {
                    power: 2,
                    toughness: 2,
                },
                TargetSpec::TargetFamiliar,
            )
            .restricted_to(TargetRestriction::Own),
        )
        .build()
}
