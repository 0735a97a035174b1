//! Session configuration
//!
//! Every section defaults to the standard tuning, so a JSON document only
//! needs the fields it overrides.

use std::path::Path;

use handworld_core::{HandworldError, HandworldResult};
use handworld_recognize::RecognizerConfig;
use handworld_world::{AnimationConfig, InteractionConfig};
use serde::{Deserialize, Serialize};

/// Log output settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset
    pub filter: String,
    /// JSON lines instead of human-readable output
    pub json: bool,
    /// Include the event target (module path)
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "handworld=info".to_string(),
            json: false,
            with_target: true,
        }
    }
}

/// Everything a session needs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Detector output beyond this many hands is dropped
    pub max_hands: usize,
    /// Formatted events kept for display
    pub event_log_capacity: usize,
    /// Weight of a new latency sample in the moving average
    pub latency_smoothing: f64,
    pub recognizer: RecognizerConfig,
    pub interaction: InteractionConfig,
    pub animation: AnimationConfig,
    pub logging: LoggingConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_hands: 2,
            event_log_capacity: 12,
            latency_smoothing: 0.1,
            recognizer: RecognizerConfig::default(),
            interaction: InteractionConfig::default(),
            animation: AnimationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> HandworldResult<Self> {
        let config: SessionConfig =
            serde_json::from_str(json).map_err(|e| HandworldError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> HandworldResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> HandworldResult<()> {
        if !(0.0..=1.0).contains(&self.latency_smoothing) {
            return Err(HandworldError::Config(format!(
                "latency_smoothing must be within [0, 1], got {}",
                self.latency_smoothing
            )));
        }
        if self.interaction.min_extent > self.interaction.max_extent {
            return Err(HandworldError::Config(
                "interaction.min_extent exceeds interaction.max_extent".to_string(),
            ));
        }
        Ok(())
    }
}
