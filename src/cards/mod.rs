//! Card catalog and card-specific rules.
//!
//! Each card is defined in its own file under `definitions/`: a function
//! returning the printed [`Card`] template and, for cards with bespoke
//! behaviour, a function returning its [`CardRules`].

pub mod definitions;

pub use definitions::*;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::action::{Action, ActionError};
use crate::card::{Card, CardInstance};
use crate::cost::CostModifier;
use crate::effect::{EffectDescriptor, TargetRef};
use crate::game_state::{GameState, StackItemKind};
use crate::ids::{CardId, InstanceId};
use crate::keywords;
use crate::rules::{CardHook, RuleBinding, RuleBuilder, RuleError, RuleOutcome, RuleType};
use crate::targeting::{TargetPredicate, TargetRequest, validate_targets};
use crate::zone::Zone;

/// An ability a card on the field can activate by paying azoth (and maybe tapping).
#[derive(Clone)]
pub struct ActivatedAbility {
    pub description: String,
    /// The effect put on the stack. Its `cost` is the activation cost.
    pub effect: EffectDescriptor,
    pub requires_tap: bool,
    /// Upper bound on chosen targets.
    pub max_targets: usize,
    pub can_target: Option<TargetPredicate>,
}

impl fmt::Debug for ActivatedAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivatedAbility")
            .field("description", &self.description)
            .field("effect", &self.effect)
            .field("requires_tap", &self.requires_tap)
            .field("max_targets", &self.max_targets)
            .finish_non_exhaustive()
    }
}

impl ActivatedAbility {
    pub fn new(description: impl Into<String>, effect: EffectDescriptor) -> Self {
        Self {
            description: description.into(),
            effect,
            requires_tap: false,
            max_targets: 1,
            can_target: None,
        }
    }

    pub fn tap(mut self) -> Self {
        self.requires_tap = true;
        self
    }

    pub fn max_targets(mut self, max: usize) -> Self {
        self.max_targets = max;
        self
    }

    pub fn can_target(mut self, predicate: TargetPredicate) -> Self {
        self.can_target = Some(predicate);
        self
    }

    pub fn cost(&self) -> u32 {
        self.effect.cost.unwrap_or(0)
    }

    pub fn rule_id(card: &CardId, index: usize) -> String {
        format!("card:{card}:activated:{index}")
    }

    /// The activation rule: checks the ability can be used with the action's
    /// targets, then pays and puts the effect on the stack.
    ///
    /// Expects the source instance in `ctx.source` and the action in `ctx.action`.
    pub fn to_rule(&self, card: &CardId, index: usize) -> RuleBuilder {
        let id = Self::rule_id(card, index);
        let check = self.clone();
        let pay = self.clone();
        let rule_id = id.clone();

        RuleBuilder::new(id)
            .rule_type(RuleType::Activated)
            .binding(RuleBinding::Card {
                card: card.clone(),
                hook: CardHook::Activated(index),
            })
            .description(self.description.clone())
            .validator(move |state, ctx| {
                let (Some(source), Some(player)) = (ctx.source, ctx.player) else {
                    return Err(ActionError::AbilityUnavailable("no source".into()));
                };
                if check.requires_tap {
                    if source.tapped {
                        return Err(ActionError::AbilityUnavailable(format!(
                            "{} is tapped",
                            source.card.name
                        )));
                    }
                    if source.summoning_sickness && !source.has_keyword(keywords::HASTE) {
                        return Err(ActionError::AbilityUnavailable(format!(
                            "{} has summoning sickness",
                            source.card.name
                        )));
                    }
                }
                let available = state.player(player).azoth_available;
                if available < check.cost() {
                    return Err(ActionError::InsufficientAzoth {
                        needed: check.cost(),
                        available,
                    });
                }
                let request = TargetRequest::new(source, player, check.effect.target)
                    .restricted(check.effect.target_restriction)
                    .with_predicate(check.can_target.as_ref());
                validate_targets(
                    ctx.book,
                    ctx.config,
                    state,
                    &request,
                    action_targets(ctx.action),
                    check.max_targets,
                )
            })
            .apply(move |state, ctx| {
                let (Some(source), Some(player)) = (ctx.source, ctx.player) else {
                    return Err(RuleError::MissingContext {
                        rule: rule_id.clone(),
                        what: "source and player",
                    });
                };
                if !state.player_mut(player).spend_azoth(pay.cost()) {
                    return Err(RuleError::Action(ActionError::InsufficientAzoth {
                        needed: pay.cost(),
                        available: state.player(player).azoth_available,
                    }));
                }
                if pay.requires_tap
                    && let Some(inst) = state.instance_mut(source.instance_id)
                {
                    inst.tapped = true;
                }
                let snapshot = state
                    .instance(source.instance_id)
                    .cloned()
                    .unwrap_or_else(|| source.clone());
                let targets = action_targets(ctx.action).to_vec();
                let item = state.push_stack(
                    StackItemKind::Activated,
                    snapshot,
                    pay.effect.clone(),
                    player,
                    targets,
                );
                tracing::debug!(stack_item = item.0, card = %source.card.name, "activated ability");
                Ok(RuleOutcome::Changed)
            })
    }
}

fn action_targets(action: Option<&Action>) -> &[TargetRef] {
    match action {
        Some(Action::ActivateAbility { targets, .. }) | Some(Action::PlayCard { targets, .. }) => {
            targets
        }
        _ => &[],
    }
}

/// Bespoke rules for one card template.
#[derive(Debug, Clone)]
pub struct CardRules {
    pub card_id: CardId,
    pub name: String,
    pub description: String,
    pub rules: Vec<RuleBuilder>,
    pub activated_abilities: Vec<ActivatedAbility>,
    /// Applies to every card played while this card is on a field.
    pub cost_modifier: Option<CostModifier>,
}

impl CardRules {
    pub fn new(
        card_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            card_id: CardId::new(card_id),
            name: name.into(),
            description: description.into(),
            rules: Vec::new(),
            activated_abilities: Vec::new(),
            cost_modifier: None,
        }
    }

    pub fn rule(mut self, rule: RuleBuilder) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn ability(mut self, ability: ActivatedAbility) -> Self {
        self.activated_abilities.push(ability);
        self
    }

    pub fn modifies_cost(mut self, modifier: CostModifier) -> Self {
        self.cost_modifier = Some(modifier);
        self
    }

    /// Starts a rule for one of this card's hooks, with id, type and binding filled in.
    pub fn hook(&self, hook: CardHook) -> RuleBuilder {
        hook_rule(&self.card_id, hook)
    }

    /// Ids of every registry rule this card contributes.
    pub fn rule_ids(&self) -> Vec<String> {
        self.rules
            .iter()
            .map(|rule| rule.id_ref().to_string())
            .chain(
                (0..self.activated_abilities.len())
                    .map(|index| ActivatedAbility::rule_id(&self.card_id, index)),
            )
            .collect()
    }
}

/// A rule builder for a card hook.
pub fn hook_rule(card: &CardId, hook: CardHook) -> RuleBuilder {
    let (name, rule_type) = match hook {
        CardHook::OnPlay => ("on_play".to_string(), RuleType::Triggered),
        CardHook::OnAttack => ("on_attack".to_string(), RuleType::Triggered),
        CardHook::OnBlock => ("on_block".to_string(), RuleType::Triggered),
        CardHook::OnDestroy => ("on_destroy".to_string(), RuleType::Triggered),
        CardHook::Static => ("static".to_string(), RuleType::Static),
        CardHook::Activated(index) => (format!("activated:{index}"), RuleType::Activated),
    };
    RuleBuilder::new(format!("card:{card}:{name}"))
        .rule_type(rule_type)
        .binding(RuleBinding::Card {
            card: card.clone(),
            hook,
        })
}

/// Instances of a card template on either field, active player first.
pub fn field_copies(state: &GameState, card: &CardId) -> Vec<InstanceId> {
    state
        .field_instances()
        .filter(|inst| inst.card_id() == card)
        .map(|inst| inst.instance_id)
        .collect()
}

/// A static rule keeping every copy of `card` at the bonus `bonus` computes.
pub fn static_bonus_rule<F>(card: &CardId, bonus: F) -> RuleBuilder
where
    F: Fn(&GameState, &CardInstance) -> (i32, i32) + 'static,
{
    let bonus = Arc::new(bonus);
    let stale = {
        let card = card.clone();
        let bonus = Arc::clone(&bonus);
        move |state: &GameState| -> Vec<(InstanceId, (i32, i32))> {
            state
                .field_instances()
                .filter(|inst| inst.card_id() == &card)
                .filter_map(|inst| {
                    let wanted = bonus(state, inst);
                    ((inst.static_power, inst.static_toughness) != wanted)
                        .then_some((inst.instance_id, wanted))
                })
                .collect()
        }
    };
    let stale = Arc::new(stale);
    let check = Arc::clone(&stale);

    hook_rule(card, CardHook::Static)
        .condition(move |state, _| !check(state).is_empty())
        .apply(move |state, _| {
            let updates = stale(state);
            let mut outcome = RuleOutcome::Unchanged;
            for (id, (power, toughness)) in updates {
                if let Some(inst) = state.instance_mut(id) {
                    outcome = outcome.or(RuleOutcome::from_changed(
                        inst.set_static_bonus(power, toughness),
                    ));
                }
            }
            Ok(outcome)
        })
}

/// Card templates by id.
#[derive(Debug, Clone, Default)]
pub struct CardRegistry {
    cards: BTreeMap<CardId, Card>,
}

impl CardRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in card.
    pub fn with_builtin_cards() -> Self {
        let mut registry = Self::new();
        for card in builtin_cards() {
            registry.register(card);
        }
        registry
    }

    pub fn register(&mut self, card: Card) {
        self.cards.insert(card.id.clone(), card);
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Look up a card by its display name.
    pub fn get_by_name(&self, name: &str) -> Option<&Card> {
        self.cards.values().find(|card| card.name == name)
    }

    pub fn all(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Templates for a list of ids. Unknown ids are skipped with a warning.
    pub fn deck(&self, ids: &[&str]) -> Vec<Card> {
        ids.iter()
            .filter_map(|id| {
                let card = self.get(&CardId::new(*id)).cloned();
                if card.is_none() {
                    tracing::warn!(card = %id, "unknown card id in deck list");
                }
                card
            })
            .collect()
    }
}

/// Every built-in card template.
pub fn builtin_cards() -> Vec<Card> {
    vec![
        fire_elemental(),
        water_elemental(),
        lightning_bolt(),
        dragon(),
        healing_spring(),
        counterspell(),
        growth_spell(),
        mana_crystal(),
        scholar_sprite(),
        azoth_conduit(),
        aegis_sentinel(),
        ashen_wisp(),
        banner_of_the_tides(),
        thornback_sentry(),
        veilstalker(),
        mistveil_wraith(),
        sunward_paladin(),
        cinder_imp(),
    ]
}

/// Bespoke rules for every built-in card that has any.
pub fn builtin_card_rules() -> Vec<CardRules> {
    vec![
        fire_elemental_rules(),
        water_elemental_rules(),
        dragon_rules(),
        azoth_conduit_rules(),
        aegis_sentinel_rules(),
        ashen_wisp_rules(),
        cinder_imp_rules(),
    ]
}

/// The zone a card enters when played from hand.
pub fn play_destination(card: &Card) -> Option<Zone> {
    use crate::types::CardType;
    match card.card_type {
        CardType::Familiar => Some(Zone::Field),
        CardType::Azoth => Some(Zone::AzothRow),
        CardType::Flag => Some(Zone::Flag),
        CardType::Spell | CardType::Burst => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardType;

    #[test]
    fn test_builtin_registry() {
        let registry = CardRegistry::with_builtin_cards();
        assert_eq!(registry.len(), builtin_cards().len());
        assert!(registry.get(&CardId::new("mana-crystal")).is_some());
        assert_eq!(
            registry.get_by_name("Lightning Bolt").map(|c| c.card_type),
            Some(CardType::Spell)
        );
    }

    #[test]
    fn test_deck_skips_unknown_ids() {
        let registry = CardRegistry::with_builtin_cards();
        let deck = registry.deck(&["scholar-sprite", "no-such-card", "lightning-bolt"]);
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_every_rules_entry_has_a_template() {
        let registry = CardRegistry::with_builtin_cards();
        for rules in builtin_card_rules() {
            assert!(registry.get(&rules.card_id).is_some(), "{}", rules.card_id);
        }
    }

    #[test]
    fn test_rule_ids_cover_abilities() {
        let rules = fire_elemental_rules();
        let ids = rules.rule_ids();
        assert!(ids.contains(&"card:fire-elemental:activated:0".to_string()));
        assert!(ids.contains(&"card:fire-elemental:static".to_string()));
    }

    #[test]
    fn test_play_destination() {
        assert_eq!(play_destination(&mana_crystal()), Some(Zone::AzothRow));
        assert_eq!(play_destination(&banner_of_the_tides()), Some(Zone::Flag));
        assert_eq!(play_destination(&lightning_bolt()), None);
    }
}
