//! Targeting system types.

use std::fmt;
use std::sync::Arc;

use crate::card::CardInstance;
use crate::effect::{TargetRestriction, TargetSpec};
use crate::game_state::GameState;
use crate::ids::PlayerIndex;

/// The result of attempting to target something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetingResult {
    Legal,
    /// Targeting is invalid for the given reason.
    Invalid(TargetingInvalidReason),
}

impl TargetingResult {
    /// Returns true if targeting is legal.
    pub fn is_legal(&self) -> bool {
        matches!(self, TargetingResult::Legal)
    }

    /// Returns true if targeting is invalid.
    pub fn is_invalid(&self) -> bool {
        matches!(self, TargetingResult::Invalid(_))
    }
}

/// Reasons why targeting is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetingInvalidReason {
    /// The ability only targets its controller's side, or only the opponent's.
    WrongController,
    /// Target has protection from the source's type or element.
    HasProtection,
    /// Target has hexproof and the source's controller is an opponent.
    HasHexproof,
    /// Target has shroud (can't be targeted by anything).
    HasShroud,
    /// The ability's own targeting predicate refused the target.
    PredicateFailed,
    /// Target doesn't match what the ability targets.
    DoesntMatchFilter,
    /// Target no longer exists.
    DoesntExist,
    /// Target card is not on a field.
    NotOnField,
}

impl fmt::Display for TargetingInvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TargetingInvalidReason::WrongController => "wrong controller",
            TargetingInvalidReason::HasProtection => "target has protection",
            TargetingInvalidReason::HasHexproof => "target has hexproof",
            TargetingInvalidReason::HasShroud => "target has shroud",
            TargetingInvalidReason::PredicateFailed => "target not allowed by the ability",
            TargetingInvalidReason::DoesntMatchFilter => "not a legal kind of target",
            TargetingInvalidReason::DoesntExist => "target does not exist",
            TargetingInvalidReason::NotOnField => "target is not on the field",
        };
        f.write_str(text)
    }
}

/// Bespoke per-ability target filter.
pub type TargetPredicate = Arc<dyn Fn(&GameState, &CardInstance) -> bool>;

/// Who is targeting, with what, and under which restrictions.
#[derive(Clone, Copy)]
pub struct TargetRequest<'a> {
    pub source: &'a CardInstance,
    pub controller: PlayerIndex,
    pub spec: TargetSpec,
    pub restriction: TargetRestriction,
    pub can_target: Option<&'a TargetPredicate>,
}

impl<'a> TargetRequest<'a> {
    pub fn new(source: &'a CardInstance, controller: PlayerIndex, spec: TargetSpec) -> Self {
        Self {
            source,
            controller,
            spec,
            restriction: TargetRestriction::Any,
            can_target: None,
        }
    }

    pub fn restricted(mut self, restriction: TargetRestriction) -> Self {
        self.restriction = restriction;
        self
    }

    pub fn with_predicate(mut self, predicate: Option<&'a TargetPredicate>) -> Self {
        self.can_target = predicate;
        self
    }
}

impl fmt::Debug for TargetRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRequest")
            .field("source", &self.source.instance_id)
            .field("controller", &self.controller)
            .field("spec", &self.spec)
            .field("restriction", &self.restriction)
            .field("can_target", &self.can_target.is_some())
            .finish()
    }
}
