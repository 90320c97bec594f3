//! Life card and damage triggers.

mod life_card_lost;
mod takes_damage;

pub use life_card_lost::LifeCardLostTrigger;
pub use takes_damage::TakesDamageTrigger;
