//! Veilstalker card definition.

use crate::card::{Card, CardBuilder};
use crate::keywords::HEXPROOF;
use crate::types::{CardType, Element};

/// Veilstalker
/// Familiar, Dark, 2 azoth, 2/1
/// Hexproof
pub fn veilstalker() -> Card {
    CardBuilder::new("veilstalker", "Veilstalker", CardType::Familiar)
        .cost(2)
        .elements(vec![Element::Dark])
        .power_toughness(2, 1)
        .keyword(HEXPROOF)
        .build()
}
