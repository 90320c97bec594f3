//! Spell and ability triggers.

mod ability_activated;
mod spell_cast;

pub use ability_activated::AbilityActivatedTrigger;
pub use spell_cast::SpellCastTrigger;
