//! Trigger matcher trait.
//!
//! A trigger fires by comparing the freshly installed state with the one it
//! replaced. Each trigger type implements [`TriggerMatcher`] with its own
//! comparison.

use crate::card::CardInstance;
use crate::game_state::GameState;
use crate::ids::PlayerIndex;

/// The card whose triggered effect is being checked.
#[derive(Debug, Clone, Copy)]
pub struct TriggerContext<'a> {
    /// The instance carrying the triggered effect, as it is in the new state.
    pub source: &'a CardInstance,

    /// The controller of the source.
    pub controller: PlayerIndex,
}

impl<'a> TriggerContext<'a> {
    pub fn new(source: &'a CardInstance, controller: PlayerIndex) -> Self {
        Self { source, controller }
    }

    /// Context for a source controlled by its owner.
    pub fn for_source(source: &'a CardInstance) -> Self {
        Self::new(source, source.controller())
    }
}

/// Trait for matching a state transition to a trigger condition.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Clone)]
/// struct TurnStartTrigger;
///
/// impl TriggerMatcher for TurnStartTrigger {
///     fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
///         state.phase == Phase::Start && previous.phase != Phase::Start
///     }
///
///     fn display(&self) -> String {
///         "At the start of your turn".to_string()
///     }
///
///     fn clone_box(&self) -> Box<dyn TriggerMatcher> {
///         Box::new(self.clone())
///     }
/// }
/// ```
pub trait TriggerMatcher: std::fmt::Debug {
    /// Check whether the transition `previous -> state` fires this trigger.
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool;

    /// Human-readable text, e.g. "When this enters the field".
    fn display(&self) -> String;

    /// Clone this trigger into a boxed trait object.
    fn clone_box(&self) -> Box<dyn TriggerMatcher>;
}

impl Clone for Box<dyn TriggerMatcher> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
