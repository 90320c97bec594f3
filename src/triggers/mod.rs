//! Named trigger conditions.
//!
//! Effect descriptors name the condition that fires them (`"enter_field"`,
//! `"card_drawn"`, ...). The rule book maps each name to a
//! [`TriggerCondition`], which wraps a [`TriggerMatcher`].
//!
//! # Module Structure
//!
//! ```text
//! triggers/
//!   mod.rs              - This file, TriggerCondition and the built-in catalog
//!   matcher_trait.rs    - TriggerMatcher trait and TriggerContext
//!   zone_changes/       - Enter field, leave field, azoth placed
//!   combat/             - Attacks, blocks
//!   phase_step/         - Turn start, turn end, phase change
//!   cards/              - Card drawn
//!   life_damage/        - Life cards lost, damage taken
//!   spell_ability/      - Spells cast, abilities activated
//! ```

pub mod matcher_trait;

pub mod cards;
pub mod combat;
pub mod life_damage;
pub mod phase_step;
pub mod spell_ability;
pub mod zone_changes;

pub use matcher_trait::{TriggerContext, TriggerMatcher};

pub use cards::*;
pub use combat::*;
pub use life_damage::*;
pub use phase_step::*;
pub use spell_ability::*;
pub use zone_changes::*;

use crate::game_state::GameState;

/// A trigger matcher registered under a name.
#[derive(Debug, Clone)]
pub struct TriggerCondition {
    pub name: String,
    pub matcher: Box<dyn TriggerMatcher>,
}

impl TriggerCondition {
    pub fn new(name: impl Into<String>, matcher: impl TriggerMatcher + 'static) -> Self {
        Self {
            name: name.into(),
            matcher: Box::new(matcher),
        }
    }

    pub fn check(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        self.matcher.matches(state, previous, ctx)
    }

    pub fn description(&self) -> String {
        self.matcher.display()
    }
}

/// Every built-in trigger condition.
pub fn builtin_trigger_conditions() -> Vec<TriggerCondition> {
    vec![
        TriggerCondition::new("enter_field", EntersFieldTrigger),
        TriggerCondition::new("leave_field", AllyLeavesFieldTrigger),
        TriggerCondition::new("card_drawn", CardDrawnTrigger),
        TriggerCondition::new("card_attacks", ThisAttacksTrigger),
        TriggerCondition::new("card_blocks", ThisBlocksTrigger),
        TriggerCondition::new("turn_start", TurnStartTrigger),
        TriggerCondition::new("turn_end", TurnEndTrigger),
        TriggerCondition::new("phase_change", PhaseChangeTrigger),
        TriggerCondition::new("azoth_placed", AzothPlacedTrigger),
        TriggerCondition::new("life_card_lost", LifeCardLostTrigger::you()),
        TriggerCondition::new("opponent_life_card_lost", LifeCardLostTrigger::opponent()),
        TriggerCondition::new("card_takes_damage", TakesDamageTrigger),
        TriggerCondition::new("spell_cast", SpellCastTrigger::any()),
        TriggerCondition::new("controller_casts_spell", SpellCastTrigger::you()),
        TriggerCondition::new("ability_activated", AbilityActivatedTrigger),
    ]
}
