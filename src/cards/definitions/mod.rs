//! Built-in card definitions, one card per file.

mod aegis_sentinel;
mod ashen_wisp;
mod azoth_conduit;
mod banner_of_the_tides;
mod cinder_imp;
mod counterspell;
mod dragon;
mod fire_elemental;
mod growth_spell;
mod healing_spring;
mod lightning_bolt;
mod mana_crystal;
mod mistveil_wraith;
mod scholar_sprite;
mod sunward_paladin;
mod thornback_sentry;
mod veilstalker;
mod water_elemental;

pub use aegis_sentinel::{aegis_sentinel, aegis_sentinel_rules};
pub use ashen_wisp::{ashen_wisp, ashen_wisp_rules};
pub use azoth_conduit::{azoth_conduit, azoth_conduit_rules};
pub use banner_of_the_tides::banner_of_the_tides;
pub use cinder_imp::{cinder_imp, cinder_imp_rules};
pub use counterspell::counterspell;
pub use dragon::{dragon, dragon_rules};
pub use fire_elemental::{fire_elemental, fire_elemental_rules};
pub use growth_spell::growth_spell;
pub use healing_spring::healing_spring;
pub use lightning_bolt::lightning_bolt;
pub use mana_crystal::mana_crystal;
pub use mistveil_wraith::mistveil_wraith;
pub use scholar_sprite::scholar_sprite;
pub use sunward_paladin::sunward_paladin;
pub use thornback_sentry::thornback_sentry;
pub use veilstalker::veilstalker;
pub use water_elemental::{water_elemental, water_elemental_rules};
