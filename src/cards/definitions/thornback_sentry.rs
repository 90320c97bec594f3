//! Thornback Sentry card definition.

use crate::card::{Card, CardBuilder};
use crate::keywords::{DEFENDER, REACH};
use crate::types::{CardType, Element};

/// Thornback Sentry
/// Familiar, Earth, 2 azoth, 0/4
/// Defender, Reach
pub fn thornback_sentry() -> Card {
    CardBuilder::new("thornback-sentry", "Thornback Sentry", CardType::Familiar)
        .cost(2)
        .elements(vec![Element::Earth])
        .power_toughness(0, 4)
        .keyword(DEFENDER)
        .keyword(REACH)
        .build()
}
