//! Effect descriptors carried by card templates and stack items.
//!
//! A descriptor says *what* happens (`EffectKind`), *when* (`EffectTiming`)
//! and *to what* (`TargetSpec`). Resolution itself is performed by the
//! resolution rules registered for each [`EffectType`].

use crate::ids::{InstanceId, PlayerIndex, StackItemId};

/// When an effect happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum EffectTiming {
    /// Resolves when the card itself resolves (spells and bursts).
    OnPlay,
    /// Fires when the named trigger condition holds.
    Triggered,
    /// Put on the stack by paying an activation cost.
    Activated,
    /// Always on while the card is in play. Applied by static rules.
    Static,
}

/// What an effect does.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum EffectKind {
    DrawCards(u32),
    Damage(u32),
    /// Damage split across every chosen target, remainder to the first.
    DamageDivided(u32),
    Destroy,
    /// Until-end-of-turn stat change.
    Buff { power: i32, toughness: i32 },
    /// Restore the controller's Familiars to full toughness.
    Heal,
    /// Return one card from the controller's graveyard to their life cards.
    RestoreLifeCard,
    TapAndFreeze,
    CounterSpell,
    GainAzoth(u32),
}

/// Discriminant of [`EffectKind`], used to dispatch resolution rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum EffectType {
    Draw,
    Damage,
    DamageDivided,
    Destroy,
    Buff,
    Heal,
    RestoreLifeCard,
    TapAndFreeze,
    Counter,
    GainAzoth,
}

impl EffectKind {
    pub fn effect_type(&self) -> EffectType {
        match self {
            EffectKind::DrawCards(_) => EffectType::Draw,
            EffectKind::Damage(_) => EffectType::Damage,
            EffectKind::DamageDivided(_) => EffectType::DamageDivided,
            EffectKind::Destroy => EffectType::Destroy,
            EffectKind::Buff { .. } => EffectType::Buff,
            EffectKind::Heal => EffectType::Heal,
            EffectKind::RestoreLifeCard => EffectType::RestoreLifeCard,
            EffectKind::TapAndFreeze => EffectType::TapAndFreeze,
            EffectKind::CounterSpell => EffectType::Counter,
            EffectKind::GainAzoth(_) => EffectType::GainAzoth,
        }
    }
}

/// What an effect is aimed at.
///
/// The `Target*` and `AnyTarget` variants are chosen by the controller and
/// checked for legality; the others are fixed by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum TargetSpec {
    None,
    SelfCard,
    Controller,
    Opponent,
    TargetFamiliar,
    TargetPlayer,
    /// A Familiar or a player.
    AnyTarget,
    TargetStackSpell,
    EachOpposingFamiliar,
    EachOwnFamiliar,
}

impl TargetSpec {
    /// Returns true if the controller must choose targets for this spec.
    pub fn is_chosen(&self) -> bool {
        matches!(
            self,
            TargetSpec::TargetFamiliar
                | TargetSpec::TargetPlayer
                | TargetSpec::AnyTarget
                | TargetSpec::TargetStackSpell
        )
    }
}

/// Which side of the table a chosen target may be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum TargetRestriction {
    #[default]
    Any,
    Own,
    Opponent,
}

/// A chosen target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum TargetRef {
    Card(InstanceId),
    Player(PlayerIndex),
    StackItem(StackItemId),
}

/// A single effect on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct EffectDescriptor {
    pub timing: EffectTiming,
    pub kind: EffectKind,
    /// Trigger-condition name for triggered effects.
    pub trigger: Option<String>,
    pub target: TargetSpec,
    pub target_restriction: TargetRestriction,
    /// Additional trigger-condition name that must also hold when firing.
    pub condition: Option<String>,
    /// Activation cost for activated effects.
    pub cost: Option<u32>,
}

impl EffectDescriptor {
    fn new(timing: EffectTiming, kind: EffectKind, target: TargetSpec) -> Self {
        Self {
            timing,
            kind,
            trigger: None,
            target,
            target_restriction: TargetRestriction::Any,
            condition: None,
            cost: None,
        }
    }

    /// An effect that happens when the card resolves.
    pub fn on_play(kind: EffectKind, target: TargetSpec) -> Self {
        Self::new(EffectTiming::OnPlay, kind, target)
    }

    /// An effect that fires when the named trigger condition holds.
    pub fn triggered(trigger: impl Into<String>, kind: EffectKind, target: TargetSpec) -> Self {
        let mut effect = Self::new(EffectTiming::Triggered, kind, target);
        effect.trigger = Some(trigger.into());
        effect
    }

    /// An effect put on the stack by an activated ability.
    pub fn activated(cost: u32, kind: EffectKind, target: TargetSpec) -> Self {
        let mut effect = Self::new(EffectTiming::Activated, kind, target);
        effect.cost = Some(cost);
        effect
    }

    pub fn restricted_to(mut self, restriction: TargetRestriction) -> Self {
        self.target_restriction = restriction;
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn effect_type(&self) -> EffectType {
        self.kind.effect_type()
    }
}
