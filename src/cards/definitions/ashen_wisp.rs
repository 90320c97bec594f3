//! Ashen Wisp card definition.

use crate::card::{Card, CardBuilder};
use crate::cards::CardRules;
use crate::rules::effects::draw_cards;
use crate::rules::{CardHook, RuleOutcome};
use crate::types::{CardType, Element};

/// Ashen Wisp
/// Familiar, Dark, 1 azoth, 1/1
/// When this is destroyed, its controller draws a card.
pub fn ashen_wisp() -> Card {
    CardBuilder::new("ashen-wisp", "Ashen Wisp", CardType::Familiar)
        .cost(1)
        .elements(vec![Element::Dark])
        .power_toughness(1, 1)
        .build()
}

pub fn ashen_wisp_rules() -> CardRules {
    let rules = CardRules::new(
        "ashen-wisp",
        "Ashen Wisp",
        "When this is destroyed, its controller draws a card.",
    );
    let last_gift = rules
        .hook(CardHook::OnDestroy)
        .description("controller draws a card")
        .condition(|_, ctx| ctx.player.is_some())
        .apply(|state, ctx| match ctx.player {
            Some(player) => Ok(draw_cards(state, player, 1)),
            None => Ok(RuleOutcome::Unchanged),
        });
    rules.rule(last_gift)
}
