//! Player and engine actions, and the reasons an action can be refused.

use crate::effect::TargetRef;
use crate::game_state::{BlockAssignment, Phase};
use crate::ids::{InstanceId, PlayerIndex};
use crate::targeting::TargetingInvalidReason;

/// Action names, exposed to callers as snake_case strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ActionKind {
    PlayCard,
    Attack,
    Block,
    ActivateAbility,
    ChangePhase,
    Concede,
}

/// An action submitted to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "action", rename_all = "snake_case")
)]
pub enum Action {
    /// Play a card from hand. Familiars, Azoth and Flags enter play directly;
    /// Spells and Bursts go on the stack.
    PlayCard {
        player: PlayerIndex,
        card: InstanceId,
        #[cfg_attr(feature = "serialization", serde(default))]
        targets: Vec<TargetRef>,
    },
    Attack {
        player: PlayerIndex,
        attackers: Vec<InstanceId>,
    },
    Block {
        player: PlayerIndex,
        blocks: Vec<BlockAssignment>,
    },
    ActivateAbility {
        player: PlayerIndex,
        card: InstanceId,
        ability: usize,
        #[cfg_attr(feature = "serialization", serde(default))]
        targets: Vec<TargetRef>,
    },
    ChangePhase {
        new_phase: Phase,
    },
    Concede {
        player: PlayerIndex,
    },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::PlayCard { .. } => ActionKind::PlayCard,
            Action::Attack { .. } => ActionKind::Attack,
            Action::Block { .. } => ActionKind::Block,
            Action::ActivateAbility { .. } => ActionKind::ActivateAbility,
            Action::ChangePhase { .. } => ActionKind::ChangePhase,
            Action::Concede { .. } => ActionKind::Concede,
        }
    }

    /// The acting player. Phase changes are taken by the engine itself.
    pub fn player(&self) -> Option<PlayerIndex> {
        match self {
            Action::PlayCard { player, .. }
            | Action::Attack { player, .. }
            | Action::Block { player, .. }
            | Action::ActivateAbility { player, .. }
            | Action::Concede { player } => Some(*player),
            Action::ChangePhase { .. } => None,
        }
    }

    /// Builds an action from its snake_case name and a JSON parameter object.
    #[cfg(feature = "serialization")]
    pub fn from_named(name: &str, params: serde_json::Value) -> Result<Action, ActionError> {
        use std::str::FromStr;

        let kind = ActionKind::from_str(name)
            .map_err(|_| ActionError::UnknownAction(name.to_string()))?;
        let mut object = match params {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => {
                return Err(ActionError::MalformedParams(format!(
                    "expected an object, got {other}"
                )));
            }
        };
        object.insert(
            "action".to_string(),
            serde_json::Value::String(kind.to_string()),
        );
        serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| ActionError::MalformedParams(e.to_string()))
    }
}

/// Result of a dry-run legality check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub message: Option<String>,
    pub details: Option<ActionError>,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
            details: None,
        }
    }

    pub fn rejected(error: ActionError) -> Self {
        Self {
            valid: false,
            message: Some(error.to_string()),
            details: Some(error),
        }
    }
}

/// Why an action was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("malformed action parameters: {0}")]
    MalformedParams(String),
    #[error("no validation rule accepts {0}")]
    NoValidator(ActionKind),
    #[error("{kind} is not allowed during the {phase} phase")]
    WrongPhase { kind: ActionKind, phase: Phase },
    #[error("{0} is not seated in this game")]
    UnknownPlayer(PlayerIndex),
    #[error("{0} is not the active player")]
    NotActivePlayer(PlayerIndex),
    #[error("{0} is not the defending player")]
    NotDefendingPlayer(PlayerIndex),
    #[error("the stack is not empty")]
    StackNotEmpty,
    #[error("card {0} is not in that player's hand")]
    CardNotInHand(InstanceId),
    #[error("card {0} is not on that player's field")]
    CardNotOnField(InstanceId),
    #[error("not enough azoth: need {needed}, have {available}")]
    InsufficientAzoth { needed: u32, available: u32 },
    #[error("azoth was already placed this turn")]
    AzothAlreadyPlaced,
    #[error("a target is required")]
    MissingTarget,
    #[error("too many targets: at most {max}")]
    TooManyTargets { max: usize },
    #[error("{0:?} is targeted more than once")]
    DuplicateTarget(TargetRef),
    #[error("illegal target {target:?}: {reason}")]
    IllegalTarget {
        target: TargetRef,
        reason: TargetingInvalidReason,
    },
    #[error("cannot change phase from {from} to {to}")]
    IllegalPhaseChange { from: Phase, to: Phase },
    #[error("{card} cannot attack: {reason}")]
    CannotAttack { card: InstanceId, reason: String },
    #[error("{blocker} cannot block {attacker}: {reason}")]
    CannotBlock {
        blocker: InstanceId,
        attacker: InstanceId,
        reason: String,
    },
    #[error("card {card} has no activated ability {index}")]
    NoSuchAbility { card: InstanceId, index: usize },
    #[error("ability cannot be activated: {0}")]
    AbilityUnavailable(String),
    #[error("{0}")]
    Rejected(String),
}
