//! Tracing setup

use handworld_core::{HandworldError, HandworldResult};
use tracing_subscriber::EnvFilter;

use crate::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` wins over `config.filter`.
/// Fails with `Config` if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> HandworldResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| HandworldError::Config(e.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| HandworldError::Config(e.to_string()))
}
