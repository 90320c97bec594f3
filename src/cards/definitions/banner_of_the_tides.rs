//! Banner of the Tides card definition.

use crate::card::{Card, CardBuilder};
use crate::effect::{EffectDescriptor, EffectKind, TargetSpec};
use crate::types::{CardType, Element};

/// Banner of the Tides
/// Flag, Water, 1 azoth
/// Whenever you cast a spell, gain 1 azoth.
pub fn banner_of_the_tides() -> Card {
    CardBuilder::new("banner-of-the-tides", "Banner of the Tides", CardType::Flag)
        .cost(1)
        .elements(vec![Element::Water])
        .effect(EffectDescriptor::triggered(
            "controller_casts_spell",
            EffectKind::GainAzoth(1),
            TargetSpec::Controller,
        ))
        .build()
}
