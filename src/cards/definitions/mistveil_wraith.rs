//! Mistveil Wraith card definition.

use crate::card::{Card, CardBuilder};
use crate::keywords::SHROUD;
use crate::types::{CardType, Element};

/// Mistveil Wraith
/// Familiar, Void, 2 azoth, 1/2
/// Shroud
pub fn mistveil_wraith() -> Card {
    CardBuilder::new("mistveil-wraith", "Mistveil Wraith", CardType::Familiar)
        .cost(2)
        .elements(vec![Element::Void])
        .power_toughness(1, 2)
        .keyword(SHROUD)
        .build()
}
