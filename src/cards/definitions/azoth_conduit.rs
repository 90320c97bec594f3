//! Azoth Conduit card definition.

use crate::card::{Card, CardBuilder};
use crate::cards::CardRules;
use crate::cost::CostModifier;
use crate::types::{CardType, Element};

/// Azoth Conduit
/// Familiar, Earth, 2 azoth, 0/2
/// Your Spells and Bursts cost 1 less.
pub fn azoth_conduit() -> Card {
    CardBuilder::new("azoth-conduit", "Azoth Conduit", CardType::Familiar)
        .cost(2)
        .elements(vec![Element::Earth])
        .power_toughness(0, 2)
        .build()
}

pub fn azoth_conduit_rules() -> CardRules {
    CardRules::new(
        "azoth-conduit",
        "Azoth Conduit",
        "Your Spells and Bursts cost 1 less.",
    )
    .modifies_cost(CostModifier::spell_discount("azoth-conduit", 1))
}
