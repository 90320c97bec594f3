//! Combat triggers.

mod this_attacks;
mod this_blocks;

pub use this_attacks::ThisAttacksTrigger;
pub use this_blocks::ThisBlocksTrigger;
