//! Built-in defaults, the lowest layer of every merge.

use crate::config::DEFAULT_ROUND_TIMEOUT_MS;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start a builder holding the built-in defaults.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder().set_default("resolver.round_timeout_ms", DEFAULT_ROUND_TIMEOUT_MS)
}
