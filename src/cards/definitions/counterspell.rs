//! Counterspell card definition.

use crate::card::{Card, CardBuilder};
use crate::effect::{EffectDescriptor, EffectKind, TargetSpec};
use crate::types::{CardType, Element};

/// Counterspell
/// Burst, Water, 2 azoth
/// Counter target spell.
pub fn counterspell() -> Card {
    CardBuilder::new("counterspell", "Counterspell", CardType::Burst)
        .cost(2)
        .elements(vec![Element::Water])
        .effect(EffectDescriptor::on_play(
            EffectKind::CounterSpell,
            TargetSpec::TargetStackSpell,
        ))
        .build()
}
