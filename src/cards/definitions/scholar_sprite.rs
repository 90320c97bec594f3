//! Scholar Sprite card definition.

use crate::card::{Card, CardBuilder};
use crate::effect::{EffectDescriptor, EffectKind, TargetSpec};
use crate::types::{CardType, Element};

/// Scholar Sprite
/// Familiar, Air, 1 azoth, 1/1
/// When this enters the field, draw a card.
pub fn scholar_sprite() -> Card {
    CardBuilder::new("scholar-sprite", "Scholar Sprite", CardType::Familiar)
        .cost(1)
        .elements(vec![Element::Air])
        .power_toughness(1, 1)
        .effect(EffectDescriptor::triggered(
            "enter_field",
            EffectKind::DrawCards(1),
            TargetSpec::Controller,
        ))
        .build()
}
