//! Engine configuration.

/// Tunables of a rules engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EngineConfig {
    /// Installed states kept for inspection.
    pub max_history_length: usize,
    /// Passes of the static and state-based fixpoint before giving up.
    pub max_sba_iterations: usize,
    /// Player 0 does not draw in the Start phase of turn 1.
    pub first_player_skips_draw: bool,
    pub starting_life_cards: usize,
    pub opening_hand_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history_length: 20,
            max_sba_iterations: 10,
            first_player_skips_draw: true,
            starting_life_cards: 4,
            opening_hand_size: 5,
        }
    }
}

/// Errors loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(String),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },
}

impl EngineConfig {
    /// Checks that the caps allow the engine to make progress.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history_length == 0 {
            return Err(ConfigError::Zero {
                field: "max_history_length",
            });
        }
        if self.max_sba_iterations == 0 {
            return Err(ConfigError::Zero {
                field: "max_sba_iterations",
            });
        }
        Ok(())
    }

    /// Parses a JSON config. Missing fields take their defaults.
    #[cfg(feature = "serialization")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serialization")]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
