//! Rule storage and the provider catalogs.

use std::collections::BTreeMap;
use std::fmt;

use crate::card::CardInstance;
use crate::cards::{CardRules, builtin_card_rules};
use crate::ids::CardId;
use crate::keywords::{KeywordRules, builtin_keyword_rules};
use crate::triggers::{TriggerCondition, builtin_trigger_conditions};

use super::{KeywordHook, Rule, RuleBinding, RuleBuilder, RuleType};
use super::{actions, combat, effects, state_based, turn_structure};

/// All registered rules, keyed by id.
///
/// Queries return rules highest priority first, ties broken by id.
#[derive(Default)]
pub struct RuleRegistry {
    rules: BTreeMap<String, Box<dyn Rule>>,
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn by_priority<'a>(mut rules: Vec<&'a dyn Rule>) -> Vec<&'a dyn Rule> {
    rules.sort_by(|a, b| {
        b.priority()
            .cmp(&a.priority())
            .then_with(|| a.id().cmp(b.id()))
    });
    rules
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rule, replacing any rule with the same id. Returns the replaced rule.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) -> Option<Box<dyn Rule>> {
        let id = rule.id().to_string();
        let replaced = self.rules.insert(id.clone(), rule);
        if replaced.is_some() {
            tracing::debug!(rule = %id, "replaced rule");
        }
        replaced
    }

    /// Builds and inserts a rule. A malformed rule is logged and dropped.
    pub fn register(&mut self, builder: RuleBuilder) -> bool {
        match builder.build() {
            Ok(rule) => {
                self.add_rule(Box::new(rule));
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "rejected malformed rule");
                false
            }
        }
    }

    /// Registers every builder. Returns how many were accepted.
    pub fn register_all(&mut self, builders: impl IntoIterator<Item = RuleBuilder>) -> usize {
        builders
            .into_iter()
            .map(|builder| self.register(builder))
            .filter(|ok| *ok)
            .count()
    }

    pub fn remove_rule(&mut self, id: &str) -> Option<Box<dyn Rule>> {
        self.rules.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.rules.get(id).map(|rule| rule.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.keys().map(String::as_str)
    }

    pub fn rules_of_type(&self, rule_type: RuleType) -> Vec<&dyn Rule> {
        by_priority(
            self.rules
                .values()
                .filter(|rule| rule.rule_type() == rule_type)
                .map(|rule| rule.as_ref())
                .collect(),
        )
    }

    pub fn rules_bound(&self, binding: &RuleBinding) -> Vec<&dyn Rule> {
        by_priority(
            self.rules
                .values()
                .filter(|rule| rule.binding() == binding)
                .map(|rule| rule.as_ref())
                .collect(),
        )
    }

    /// Rules of a given type bound to `binding`.
    pub fn rules_bound_of_type(&self, binding: &RuleBinding, rule_type: RuleType) -> Vec<&dyn Rule> {
        self.rules_bound(binding)
            .into_iter()
            .filter(|rule| rule.rule_type() == rule_type)
            .collect()
    }

    /// Keyword rules at `hook` for every keyword `card` carries.
    pub fn keyword_rules_for(&self, hook: KeywordHook, card: &CardInstance) -> Vec<&dyn Rule> {
        by_priority(
            self.rules
                .values()
                .filter(|rule| match rule.binding() {
                    RuleBinding::Keyword { keyword, hook: h } => {
                        *h == hook && card.has_keyword(keyword)
                    }
                    _ => false,
                })
                .map(|rule| rule.as_ref())
                .collect(),
        )
    }

    /// Rules that carry a cost modifier.
    pub fn cost_rules(&self) -> Vec<&dyn Rule> {
        by_priority(
            self.rules
                .values()
                .filter(|rule| rule.cost_modifier().is_some())
                .map(|rule| rule.as_ref())
                .collect(),
        )
    }
}

/// The registry plus the three provider catalogs it was built from.
#[derive(Debug, Default)]
pub struct RuleBook {
    pub registry: RuleRegistry,
    card_rules: BTreeMap<CardId, CardRules>,
    keyword_rules: Vec<KeywordRules>,
    trigger_conditions: BTreeMap<String, TriggerCondition>,
}

/// The engine's own rules: action handling, turn structure, state-based
/// actions, effect resolution and combat.
pub fn core_rules() -> Vec<RuleBuilder> {
    let mut rules = actions::rules();
    rules.extend(turn_structure::rules());
    rules.extend(state_based::rules());
    rules.extend(effects::rules());
    rules.extend(combat::rules());
    rules
}

impl RuleBook {
    /// No rules and no catalogs.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(
        core: Vec<RuleBuilder>,
        cards: Vec<CardRules>,
        keywords: Vec<KeywordRules>,
        triggers: Vec<TriggerCondition>,
    ) -> Self {
        let mut book = Self::empty();
        let core_count = book.registry.register_all(core);
        for rules in cards {
            book.add_card_rules(rules);
        }
        for rules in keywords {
            book.add_keyword_rules(rules);
        }
        for condition in triggers {
            book.add_trigger_condition(condition);
        }
        tracing::info!(
            core = core_count,
            total = book.registry.len(),
            cards = book.card_rules.len(),
            keywords = book.keyword_rules.len(),
            triggers = book.trigger_conditions.len(),
            "rule book ready"
        );
        book
    }

    /// The engine's rules with every built-in card, keyword and trigger condition.
    pub fn builtin() -> Self {
        Self::new(
            core_rules(),
            builtin_card_rules(),
            builtin_keyword_rules(),
            builtin_trigger_conditions(),
        )
    }

    /// Registers a card's rules and activated abilities, replacing earlier ones for that card.
    pub fn add_card_rules(&mut self, rules: CardRules) {
        if let Some(old) = self.card_rules.remove(&rules.card_id) {
            for id in old.rule_ids() {
                self.registry.remove_rule(&id);
            }
        }
        self.registry.register_all(rules.rules.iter().cloned());
        for (index, ability) in rules.activated_abilities.iter().enumerate() {
            self.registry
                .register(ability.to_rule(&rules.card_id, index));
        }
        self.card_rules.insert(rules.card_id.clone(), rules);
    }

    pub fn add_keyword_rules(&mut self, rules: KeywordRules) {
        self.registry.register_all(rules.rules.iter().cloned());
        self.keyword_rules
            .retain(|k| !k.keyword.eq_ignore_ascii_case(&rules.keyword));
        self.keyword_rules.push(rules);
    }

    pub fn add_trigger_condition(&mut self, condition: TriggerCondition) {
        self.trigger_conditions
            .insert(condition.name.clone(), condition);
    }

    pub fn card_rules(&self, card: &CardId) -> Option<&CardRules> {
        self.card_rules.get(card)
    }

    pub fn keyword_rules(&self, keyword: &str) -> Option<&KeywordRules> {
        self.keyword_rules
            .iter()
            .find(|k| k.keyword.eq_ignore_ascii_case(keyword))
    }

    pub fn trigger_condition(&self, name: &str) -> Option<&TriggerCondition> {
        self.trigger_conditions.get(name)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &KeywordRules> + '_ {
        self.keyword_rules.iter()
    }
}
