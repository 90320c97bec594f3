//! Lightning Bolt card definition.

use crate::card::{Card, CardBuilder};
use crate::effect::{EffectDescriptor, EffectKind, TargetSpec};
use crate::types::{CardType, Element};

/// Lightning Bolt
/// Spell, Fire, 1 azoth
/// Deals 3 damage to any target.
pub fn lightning_bolt() -> Card {
    CardBuilder::new("lightning-bolt", "Lightning Bolt", CardType::Spell)
        .cost(1)
        .elements(vec![Element::Fire])
        .effect(EffectDescriptor::on_play(
            EffectKind::Damage(3),
            TargetSpec::AnyTarget,
        ))
        .build()
}
