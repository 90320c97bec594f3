//! Zone change triggers.
//!
//! These fire when cards move in or out of play.

mod azoth_placed;
mod enters_field;
mod leaves_field;

pub use azoth_placed::AzothPlacedTrigger;
pub use enters_field::EntersFieldTrigger;
pub use leaves_field::AllyLeavesFieldTrigger;
