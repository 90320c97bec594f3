//! Fire Elemental card definition.

use crate::card::{Card, CardBuilder};
use crate::cards::{ActivatedAbility, CardRules, static_bonus_rule};
use crate::effect::{EffectDescriptor, EffectKind, TargetSpec};
use crate::rules::effects::deal_damage;
use crate::rules::{CardHook, RuleOutcome};
use crate::targeting::fixed_targets;
use crate::types::{CardType, Element};

/// Fire Elemental
/// Familiar, Fire, 3 azoth, 2/3
/// Gets +1/+0 for each azoth its controller has placed.
/// Whenever this attacks, it deals 1 damage to each opposing Familiar.
/// 2 azoth, tap: 2 damage to target Familiar.
pub fn fire_elemental() -> Card {
    CardBuilder::new("fire-elemental", "Fire Elemental", CardType::Familiar)
        .cost(3)
        .elements(vec![Element::Fire])
        .power_toughness(2, 3)
        .build()
}

pub fn fire_elemental_rules() -> CardRules {
    let rules = CardRules::new(
        "fire-elemental",
        "Fire Elemental",
        "Grows with azoth, scorches blockers-to-be when attacking.",
    );

    let growth = static_bonus_rule(&rules.card_id, |state, inst| {
        (state.player(inst.controller()).azoth_row.len() as i32, 0)
    })
    .description("+1/+0 per azoth placed");

    let scorch = rules
        .hook(CardHook::OnAttack)
        .description("1 damage to each opposing Familiar")
        .condition(|_, ctx| ctx.source.is_some())
        .apply(|state, ctx| {
            let Some(source) = ctx.source else {
                return Ok(RuleOutcome::Unchanged);
            };
            let targets = fixed_targets(
                state,
                source,
                source.controller(),
                TargetSpec::EachOpposingFamiliar,
            );
            Ok(targets
                .into_iter()
                .fold(RuleOutcome::Unchanged, |outcome, target| {
                    outcome.or(deal_damage(state, source, target, 1))
                }))
        });

    let firebolt = ActivatedAbility::new(
        "2 azoth, tap: 2 damage to target Familiar",
        EffectDescriptor::activated(2, EffectKind::Damage(2), TargetSpec::TargetFamiliar),
    )
    .tap();

    rules.rule(growth).rule(scorch).ability(firebolt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::game_state::GameState;
    use crate::ids::PlayerIndex;
    use crate::rules::{RuleBook, RuleContext};
    use crate::zone::Zone;

    #[test]
    fn test_definition() {
        let card = fire_elemental();
        assert_eq!(card.cost, 3);
        assert_eq!((card.power, card.toughness), (Some(2), Some(3)));
        assert!(card.is_familiar());
    }

    #[test]
    fn test_grows_with_azoth() {
        let book = RuleBook::builtin();
        let config = EngineConfig::default();
        let mut state = GameState::new("Alice", "Bob");
        let id = state.add_card(PlayerIndex::FIRST, Zone::Field, fire_elemental());
        for _ in 0..2 {
            state.add_card(PlayerIndex::FIRST, Zone::AzothRow, crate::cards::mana_crystal());
        }

        let rule = book.registry.get("card:fire-elemental:static").unwrap();
        let ctx = RuleContext::new(&book, &config);
        assert!(rule.condition(&state, &ctx));
        assert_eq!(rule.apply(&mut state, &ctx), Ok(RuleOutcome::Changed));
        assert_eq!(state.instance(id).unwrap().power, 4);
        assert!(!rule.condition(&state, &ctx));
    }

    #[test]
    fn test_attack_scorches_opposing_familiars() {
        let book = RuleBook::builtin();
        let config = EngineConfig::default();
        let mut state = GameState::new("Alice", "Bob");
        let id = state.add_card(PlayerIndex::FIRST, Zone::Field, fire_elemental());
        let enemy = state.add_card(PlayerIndex::SECOND, Zone::Field, crate::cards::thornback_sentry());
        let source = state.instance(id).unwrap().clone();

        let rule = book.registry.get("card:fire-elemental:on_attack").unwrap();
        let ctx = RuleContext::new(&book, &config).with_source(&source);
        assert_eq!(rule.apply(&mut state, &ctx), Ok(RuleOutcome::Changed));
        assert_eq!(state.instance(enemy).unwrap().toughness, 3);
    }
}
