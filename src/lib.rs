//! Azoth - a rule-driven engine for a two-player card game.
//!
//! Every piece of game logic (action validation, action effects, turn
//! structure, combat, keywords, state-based actions, card text) is a
//! [`Rule`] registered in a [`RuleBook`]. The [`RulesEngine`] owns the
//! current [`GameState`], runs the rules against it and reports what
//! happened to subscribed listeners.

pub mod action;
pub mod card;
pub mod cards;
pub mod config;
pub mod cost;
pub mod effect;
pub mod engine;
pub mod events;
pub mod game_state;
pub mod ids;
pub mod keywords;
pub mod player;
pub mod rules;
pub mod setup;
pub mod targeting;
pub mod triggers;
pub mod types;
pub mod zone;

#[cfg(test)]
mod tests;

pub use action::{Action, ActionError, ActionKind, Validation};
pub use card::{Card, CardBuilder, CardInstance};
pub use cards::{ActivatedAbility, CardRegistry, CardRules, builtin_cards};
pub use config::{ConfigError, EngineConfig};
pub use cost::{CostModifier, calculate_cost};
pub use effect::{
    EffectDescriptor, EffectKind, EffectTiming, EffectType, TargetRef, TargetRestriction,
    TargetSpec,
};
pub use engine::{RulesEngine, run_fixpoint};
pub use events::{EngineEvent, EventBus, EventKind, ListenerError, ListenerId};
pub use game_state::{
    BlockAssignment, GameState, Phase, StackItem, StackItemKind, StateError, TurnAction,
};
pub use ids::{CardId, InstanceId, PlayerIndex, StackItemId};
pub use player::Player;
pub use rules::{
    CardHook, KeywordHook, RegistrationError, Rule, RuleBinding, RuleBook, RuleBuilder,
    RuleContext, RuleError, RuleOutcome, RuleRegistry, RuleType,
};
pub use setup::GameSetup;
pub use targeting::{
    TargetPredicate, TargetRequest, TargetingInvalidReason, TargetingResult, is_valid_target,
    legal_targets,
};
pub use triggers::{TriggerCondition, TriggerContext, TriggerMatcher};
pub use types::{CardType, Element, ProtectionFrom};
pub use zone::Zone;
