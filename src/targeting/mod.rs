//! Centralized targeting system for spells and abilities.
//!
//! This module provides a unified targeting system that handles:
//! - Computing legal targets for spells and abilities
//! - Validating targets when an action is declared
//! - Re-checking targets during resolution
//!
//! Protection, hexproof and shroud are keyword rules bound to
//! [`KeywordHook::Targeting`](crate::rules::KeywordHook::Targeting); this
//! module runs them for every keyword the target carries.

mod computation;
mod types;

pub use computation::*;
pub use types::*;
