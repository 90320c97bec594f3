//! Aegis Sentinel card definition.

use crate::card::{Card, CardBuilder};
use crate::cards::{CardRules, field_copies};
use crate::effect::{EffectType, TargetRef};
use crate::game_state::GameState;
use crate::ids::InstanceId;
use crate::rules::{RuleBinding, RuleBuilder, RuleContext, RuleOutcome, RuleType};
use crate::types::{CardType, Element};

/// Aegis Sentinel
/// Familiar, Light, 3 azoth, 1/3
/// If a Familiar you control would be destroyed, tap it instead.
pub fn aegis_sentinel() -> Card {
    CardBuilder::new("aegis-sentinel", "Aegis Sentinel", CardType::Familiar)
        .cost(3)
        .elements(vec![Element::Light])
        .power_toughness(1, 3)
        .build()
}

/// The destroyed Familiar, if a sentinel guards its controller's field.
fn guarded(state: &GameState, ctx: &RuleContext<'_>) -> Option<InstanceId> {
    let Some(TargetRef::Card(id)) = ctx.target else {
        return None;
    };
    let target = state.instance(id).filter(|_| state.is_on_field(id))?;
    if !target.card.is_familiar() {
        return None;
    }
    let sentinel = crate::ids::CardId::new("aegis-sentinel");
    field_copies(state, &sentinel)
        .into_iter()
        .filter_map(|s| state.instance(s))
        .any(|s| s.controller() == target.controller())
        .then_some(id)
}

pub fn aegis_sentinel_rules() -> CardRules {
    let shield = RuleBuilder::new("card:aegis-sentinel:replace_destroy")
        .rule_type(RuleType::Replacement)
        .binding(RuleBinding::Effect(EffectType::Destroy))
        .priority(50)
        .description("destroy on an allied Familiar taps it instead")
        .condition(|state, ctx| guarded(state, ctx).is_some())
        .apply(|state, ctx| {
            let Some(id) = guarded(state, ctx) else {
                return Ok(RuleOutcome::Unchanged);
            };
            match state.instance_mut(id) {
                Some(inst) if !inst.tapped => {
                    inst.tapped = true;
                    tracing::debug!(instance = %id, "aegis sentinel taps instead of destroy");
                    Ok(RuleOutcome::Changed)
                }
                _ => Ok(RuleOutcome::Unchanged),
            }
        });

    CardRules::new(
        "aegis-sentinel",
        "Aegis Sentinel",
        "If a Familiar you control would be destroyed, tap it instead.",
    )
    .rule(shield)
}
