//! Rules framework.
//!
//! Every piece of game behaviour is a [`Rule`]: an id, a [`RuleType`], a
//! [`RuleBinding`] saying where the engine dispatches it, a condition and an
//! apply step. The engine never hardcodes card or keyword behaviour; it asks
//! the [`RuleRegistry`] for the rules bound to what it is doing.

pub mod actions;
pub mod combat;
pub mod effects;
pub mod registry;
pub mod state_based;
pub mod turn_structure;

pub use registry::{RuleBook, RuleRegistry};

use std::fmt;
use std::sync::Arc;

use crate::action::{Action, ActionError, ActionKind};
use crate::card::CardInstance;
use crate::config::EngineConfig;
use crate::cost::CostModifier;
use crate::effect::{EffectDescriptor, EffectType, TargetRef};
use crate::game_state::{GameState, Phase, StackItem, StateError};
use crate::ids::{CardId, PlayerIndex};

/// The nine kinds of rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum RuleType {
    Static,
    Triggered,
    Activated,
    Replacement,
    StateBased,
    TurnStructure,
    Cost,
    Targeting,
    Resolution,
}

/// Card-specific dispatch points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardHook {
    /// The card entered the field or resolved.
    OnPlay,
    OnAttack,
    OnBlock,
    /// The card went from a field to a graveyard.
    OnDestroy,
    Static,
    /// Activated ability at this index.
    Activated(usize),
}

/// Keyword dispatch points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordHook {
    Static,
    /// The keyword holder was declared as an attacker.
    OnAttack,
    /// The keyword holder, attacking, was blocked.
    OnBlocked,
    /// Decides whether the keyword holder may attack.
    AttackRestriction,
    /// Decides whether a block involving the keyword holder is legal.
    BlockRestriction,
    /// Decides whether the keyword holder may be targeted.
    Targeting,
}

/// Where the engine dispatches a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RuleBinding {
    /// Found only by type (static, state-based and cost rules).
    #[default]
    Unbound,
    /// Runs when the game enters the phase.
    PhaseEntry(Phase),
    /// Legality check for an action; any holding validator makes it legal.
    Validate(ActionKind),
    /// Performs an action.
    Action(ActionKind),
    /// Resolves a stack effect; replacement rules bound here pre-empt it.
    Effect(EffectType),
    Card { card: CardId, hook: CardHook },
    Keyword { keyword: String, hook: KeywordHook },
}

impl RuleBinding {
    pub fn card(card: impl Into<String>, hook: CardHook) -> Self {
        RuleBinding::Card {
            card: CardId::new(card),
            hook,
        }
    }

    pub fn keyword(keyword: impl Into<String>, hook: KeywordHook) -> Self {
        RuleBinding::Keyword {
            keyword: keyword.into(),
            hook,
        }
    }
}

/// Whether applying a rule changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Changed,
    Unchanged,
}

impl RuleOutcome {
    pub fn from_changed(changed: bool) -> Self {
        if changed {
            RuleOutcome::Changed
        } else {
            RuleOutcome::Unchanged
        }
    }

    pub fn changed(self) -> bool {
        self == RuleOutcome::Changed
    }

    /// Changed if either is.
    pub fn or(self, other: RuleOutcome) -> RuleOutcome {
        RuleOutcome::from_changed(self.changed() || other.changed())
    }
}

/// Errors raised while applying a rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("rule {rule} needs {what} in its context")]
    MissingContext { rule: String, what: &'static str },
}

/// Errors raised when a rule definition is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("rule has an empty id")]
    EmptyId,
    #[error("rule {0} has no type")]
    MissingType(String),
    #[error("rule {0} has no condition")]
    MissingCondition(String),
    #[error("rule {0} has no apply step")]
    MissingApply(String),
}

/// What a rule knows about the situation it is evaluated in.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub book: &'a RuleBook,
    pub config: &'a EngineConfig,
    pub action: Option<&'a Action>,
    pub stack_item: Option<&'a StackItem>,
    pub effect: Option<&'a EffectDescriptor>,
    /// The card the rule acts for, e.g. the attacker or the ability's source.
    pub source: Option<&'a CardInstance>,
    pub target: Option<TargetRef>,
    pub player: Option<PlayerIndex>,
}

impl<'a> RuleContext<'a> {
    pub fn new(book: &'a RuleBook, config: &'a EngineConfig) -> Self {
        Self {
            book,
            config,
            action: None,
            stack_item: None,
            effect: None,
            source: None,
            target: None,
            player: None,
        }
    }

    pub fn with_action(mut self, action: &'a Action) -> Self {
        self.action = Some(action);
        self.player = action.player().or(self.player);
        self
    }

    pub fn with_stack_item(mut self, item: &'a StackItem) -> Self {
        self.stack_item = Some(item);
        self.effect = Some(&item.effect);
        self.source = Some(&item.source);
        self.player = Some(item.controller);
        self
    }

    pub fn with_effect(mut self, effect: &'a EffectDescriptor) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_source(mut self, source: &'a CardInstance) -> Self {
        self.source = Some(source);
        self.player = self.player.or(Some(source.owner));
        self
    }

    pub fn with_target(mut self, target: TargetRef) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_player(mut self, player: PlayerIndex) -> Self {
        self.player = Some(player);
        self
    }
}

impl fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleContext")
            .field("action", &self.action)
            .field("stack_item", &self.stack_item.map(|item| item.id))
            .field("source", &self.source.map(|s| s.instance_id))
            .field("target", &self.target)
            .field("player", &self.player)
            .finish()
    }
}

/// A rule.
pub trait Rule {
    fn id(&self) -> &str;

    fn rule_type(&self) -> RuleType;

    fn binding(&self) -> &RuleBinding;

    /// Higher runs first among candidates.
    fn priority(&self) -> i32 {
        0
    }

    fn description(&self) -> &str {
        ""
    }

    fn condition(&self, state: &GameState, ctx: &RuleContext<'_>) -> bool;

    fn apply(&self, state: &mut GameState, ctx: &RuleContext<'_>)
    -> Result<RuleOutcome, RuleError>;

    /// For validation rules: why the condition does not hold.
    fn rejection(&self, _state: &GameState, _ctx: &RuleContext<'_>) -> Option<ActionError> {
        None
    }

    fn cost_modifier(&self) -> Option<&CostModifier> {
        None
    }
}

pub type ConditionFn = Arc<dyn Fn(&GameState, &RuleContext<'_>) -> bool>;
pub type ApplyFn = Arc<dyn Fn(&mut GameState, &RuleContext<'_>) -> Result<RuleOutcome, RuleError>>;
pub type ValidateFn = Arc<dyn Fn(&GameState, &RuleContext<'_>) -> Result<(), ActionError>>;

/// A rule made of closures, produced by [`RuleBuilder`].
#[derive(Clone)]
pub struct FnRule {
    id: String,
    rule_type: RuleType,
    binding: RuleBinding,
    priority: i32,
    description: String,
    condition: ConditionFn,
    apply: ApplyFn,
    validate: Option<ValidateFn>,
    cost_modifier: Option<CostModifier>,
}

impl fmt::Debug for FnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("id", &self.id)
            .field("rule_type", &self.rule_type)
            .field("binding", &self.binding)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl Rule for FnRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    fn binding(&self) -> &RuleBinding {
        &self.binding
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn condition(&self, state: &GameState, ctx: &RuleContext<'_>) -> bool {
        (self.condition)(state, ctx)
    }

    fn apply(
        &self,
        state: &mut GameState,
        ctx: &RuleContext<'_>,
    ) -> Result<RuleOutcome, RuleError> {
        (self.apply)(state, ctx)
    }

    fn rejection(&self, state: &GameState, ctx: &RuleContext<'_>) -> Option<ActionError> {
        self.validate.as_ref().and_then(|v| v(state, ctx).err())
    }

    fn cost_modifier(&self) -> Option<&CostModifier> {
        self.cost_modifier.as_ref()
    }
}

/// Applies, in order, every rule whose condition holds.
pub fn apply_holding(
    rules: &[&dyn Rule],
    state: &mut GameState,
    ctx: &RuleContext<'_>,
) -> Result<RuleOutcome, RuleError> {
    let mut outcome = RuleOutcome::Unchanged;
    for rule in rules {
        if rule.condition(state, ctx) {
            tracing::trace!(rule = rule.id(), "applying rule");
            outcome = outcome.or(rule.apply(state, ctx)?);
        }
    }
    Ok(outcome)
}

/// The first rejection among `rules`, if any rejects.
pub fn first_rejection(
    rules: &[&dyn Rule],
    state: &GameState,
    ctx: &RuleContext<'_>,
) -> Option<ActionError> {
    rules.iter().find_map(|rule| {
        if rule.condition(state, ctx) {
            None
        } else {
            Some(rule.rejection(state, ctx).unwrap_or_else(|| {
                ActionError::Rejected(format!("rule {} does not hold", rule.id()))
            }))
        }
    })
}

fn condition_fn<F>(condition: F) -> ConditionFn
where
    F: Fn(&GameState, &RuleContext<'_>) -> bool + 'static,
{
    Arc::new(condition)
}

fn no_change(_: &mut GameState, _: &RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
    Ok(RuleOutcome::Unchanged)
}

/// Builder for closure-backed rules.
///
/// ```ignore
/// RuleBuilder::new("sba_zero_toughness")
///     .rule_type(RuleType::StateBased)
///     .condition(|state, _| has_dead_familiar(state))
///     .apply(|state, _| destroy_dead_familiars(state))
///     .build()
/// ```
#[derive(Clone, Default)]
pub struct RuleBuilder {
    id: String,
    rule_type: Option<RuleType>,
    binding: RuleBinding,
    priority: i32,
    description: String,
    condition: Option<ConditionFn>,
    apply: Option<ApplyFn>,
    validate: Option<ValidateFn>,
    cost_modifier: Option<CostModifier>,
}

impl fmt::Debug for RuleBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleBuilder")
            .field("id", &self.id)
            .field("rule_type", &self.rule_type)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

impl RuleBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn id_ref(&self) -> &str {
        &self.id
    }

    pub fn rule_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = Some(rule_type);
        self
    }

    pub fn binding(mut self, binding: RuleBinding) -> Self {
        self.binding = binding;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&GameState, &RuleContext<'_>) -> bool + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    pub fn apply<F>(mut self, apply: F) -> Self
    where
        F: Fn(&mut GameState, &RuleContext<'_>) -> Result<RuleOutcome, RuleError> + 'static,
    {
        self.apply = Some(Arc::new(apply));
        self
    }

    /// A legality check. Supplies the condition (holds when `validate` is `Ok`)
    /// and a no-op apply step unless one is set.
    pub fn validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&GameState, &RuleContext<'_>) -> Result<(), ActionError> + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    /// Marks this rule as a cost modifier. The apply step defaults to a no-op.
    pub fn cost_modifier(mut self, modifier: CostModifier) -> Self {
        self.cost_modifier = Some(modifier);
        self
    }

    pub fn build(self) -> Result<FnRule, RegistrationError> {
        if self.id.trim().is_empty() {
            return Err(RegistrationError::EmptyId);
        }
        let rule_type = self
            .rule_type
            .ok_or_else(|| RegistrationError::MissingType(self.id.clone()))?;

        let condition = match (self.condition, &self.validate) {
            (Some(condition), _) => condition,
            (None, Some(validate)) => {
                let validate = Arc::clone(validate);
                condition_fn(move |state, ctx| validate(state, ctx).is_ok())
            }
            (None, None) => return Err(RegistrationError::MissingCondition(self.id)),
        };

        let apply = match self.apply {
            Some(apply) => apply,
            None if self.validate.is_some() || self.cost_modifier.is_some() => {
                Arc::new(no_change) as ApplyFn
            }
            None => return Err(RegistrationError::MissingApply(self.id)),
        };

        Ok(FnRule {
            id: self.id,
            rule_type,
            binding: self.binding,
            priority: self.priority,
            description: self.description,
            condition,
            apply,
            validate: self.validate,
            cost_modifier: self.cost_modifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_empty_id() {
        let result = RuleBuilder::new("  ")
            .rule_type(RuleType::Static)
            .condition(|_, _| true)
            .apply(|_, _| Ok(RuleOutcome::Unchanged))
            .build();
        assert_eq!(result.unwrap_err(), RegistrationError::EmptyId);
    }

    #[test]
    fn test_build_rejects_missing_parts() {
        let no_type = RuleBuilder::new("a")
            .condition(|_, _| true)
            .apply(|_, _| Ok(RuleOutcome::Unchanged))
            .build();
        assert_eq!(
            no_type.unwrap_err(),
            RegistrationError::MissingType("a".into())
        );

        let no_condition = RuleBuilder::new("b")
            .rule_type(RuleType::StateBased)
            .apply(|_, _| Ok(RuleOutcome::Unchanged))
            .build();
        assert_eq!(
            no_condition.unwrap_err(),
            RegistrationError::MissingCondition("b".into())
        );

        let no_apply = RuleBuilder::new("c")
            .rule_type(RuleType::StateBased)
            .condition(|_, _| true)
            .build();
        assert_eq!(
            no_apply.unwrap_err(),
            RegistrationError::MissingApply("c".into())
        );
    }

    #[test]
    fn test_validator_supplies_condition_and_rejection() {
        let rule = RuleBuilder::new("validate_concede")
            .rule_type(RuleType::TurnStructure)
            .binding(RuleBinding::Validate(ActionKind::Concede))
            .validator(|state, _| {
                if state.is_game_over() {
                    Err(ActionError::GameOver)
                } else {
                    Ok(())
                }
            })
            .build()
            .unwrap();

        let book = RuleBook::empty();
        let config = EngineConfig::default();
        let ctx = RuleContext::new(&book, &config);
        let mut state = GameState::new("Alice", "Bob");
        assert!(rule.condition(&state, &ctx));
        assert_eq!(rule.rejection(&state, &ctx), None);
        assert_eq!(rule.apply(&mut state, &ctx), Ok(RuleOutcome::Unchanged));

        state.declare_winner(PlayerIndex::FIRST);
        assert!(!rule.condition(&state, &ctx));
        assert_eq!(rule.rejection(&state, &ctx), Some(ActionError::GameOver));
    }

    #[test]
    fn test_outcome_or() {
        assert!(RuleOutcome::Unchanged.or(RuleOutcome::Changed).changed());
        assert!(!RuleOutcome::Unchanged.or(RuleOutcome::Unchanged).changed());
    }
}
