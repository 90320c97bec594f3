//! Healing Spring card definition.

use crate::card::{Card, CardBuilder};
use crate::effect::{EffectDescriptor, EffectKind, TargetSpec};
use crate::types::{CardType, Element};

/// Healing Spring
/// Spell, Water Light, 2 azoth
/// Heal each Familiar you control. Return a card from your graveyard to your life cards.
pub fn healing_spring() -> Card {
    CardBuilder::new("healing-spring", "Healing Spring", CardType::Spell)
        .cost(2)
        .elements(vec![Element::Water, Element::Light])
        .effect(EffectDescriptor::on_play(
            EffectKind::Heal,
            TargetSpec::EachOwnFamiliar,
        ))
        .effect(EffectDescriptor::on_play(
            EffectKind::RestoreLifeCard,
            TargetSpec::Controller,
        ))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_no_chosen_targets() {
        let card = healing_spring();
        assert_eq!(card.effects.len(), 2);
        assert!(card.effects.iter().all(|e| !e.target.is_chosen()));
    }
}
