/// A named container of card instances.
///
/// `Flag` is the single-card flag slot; the stack is not a player zone and is
/// modelled by [`crate::game_state::StackItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Zone {
    Deck,
    Hand,
    Field,
    AzothRow,
    LifeCards,
    Graveyard,
    Removed,
    Flag,
}

impl Zone {
    /// Returns true if objects in this zone are public (visible to all players).
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Zone::Field | Zone::AzothRow | Zone::Graveyard | Zone::Removed | Zone::Flag
        )
    }

    /// Returns true if objects in this zone are hidden (private to owner).
    pub fn is_hidden(&self) -> bool {
        matches!(self, Zone::Deck | Zone::Hand | Zone::LifeCards)
    }

    /// Returns true if cards in this zone are ordered (order matters).
    pub fn is_ordered(&self) -> bool {
        matches!(self, Zone::Deck | Zone::LifeCards)
    }

    /// Returns true if instances in this zone keep their transient in-play state.
    pub fn is_in_play(&self) -> bool {
        matches!(self, Zone::Field | Zone::AzothRow | Zone::Flag)
    }
}
