//! "Whenever this Familiar is dealt damage" trigger.

use crate::card::CardInstance;
use crate::game_state::GameState;
use crate::triggers::matcher_trait::{TriggerContext, TriggerMatcher};

/// Fires when damage marked on the source went up.
///
/// Marked damage is the gap between full and current toughness, so stat
/// changes alone do not fire it.
#[derive(Debug, Clone, PartialEq)]
pub struct TakesDamageTrigger;

fn marked_damage(inst: &CardInstance) -> i32 {
    inst.max_toughness() - inst.toughness
}

impl TriggerMatcher for TakesDamageTrigger {
    fn matches(&self, state: &GameState, previous: &GameState, ctx: &TriggerContext) -> bool {
        let id = ctx.source.instance_id;
        match (state.instance(id), previous.instance(id)) {
            (Some(now), Some(before)) if state.is_on_field(id) => {
                marked_damage(now) > marked_damage(before)
            }
            _ => false,
        }
    }

    fn display(&self) -> String {
        "Whenever this Familiar is dealt damage".to_string()
    }

    fn clone_box(&self) -> Box<dyn TriggerMatcher> {
        Box::new(self.clone())
    }
}
