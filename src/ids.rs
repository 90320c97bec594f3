use std::fmt;

/// Player identifier, index-based. A game always has exactly two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PlayerIndex(pub u8);

/// Unique card instance identifier, allocated by the owning [`GameState`].
///
/// Never reused within a game. The same template played twice yields two
/// distinct instance ids.
///
/// [`GameState`]: crate::game_state::GameState
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct InstanceId(pub u64);

/// Identifier of a pending stack item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct StackItemId(pub u64);

/// Card template identifier, e.g. `"fire-elemental"`.
///
/// Card-specific rules are keyed by this id, not by instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct CardId(pub String);

impl PlayerIndex {
    pub const FIRST: PlayerIndex = PlayerIndex(0);
    pub const SECOND: PlayerIndex = PlayerIndex(1);

    /// Create a player index from a raw index.
    pub fn from_index(index: u8) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// True for the two players of a game.
    pub fn is_seated(self) -> bool {
        self.0 < 2
    }

    /// The other player in a two-player game.
    pub fn opponent(self) -> Self {
        Self(1 - (self.0 & 1))
    }
}

impl fmt::Display for PlayerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

impl InstanceId {
    /// Create an instance id from a specific value (for when you need explicit control).
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
