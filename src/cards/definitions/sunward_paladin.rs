//! Sunward Paladin card definition.

use crate::card::{Card, CardBuilder};
use crate::keywords::PROTECTION;
use crate::types::{CardType, Element, ProtectionFrom};

/// Sunward Paladin
/// Familiar, Light, 3 azoth, 2/2
/// Protection from Dark
pub fn sunward_paladin() -> Card {
    CardBuilder::new("sunward-paladin", "Sunward Paladin", CardType::Familiar)
        .cost(3)
        .elements(vec![Element::Light])
        .power_toughness(2, 2)
        .keyword(PROTECTION)
        .protection_from(ProtectionFrom::Element(Element::Dark))
        .build()
}
