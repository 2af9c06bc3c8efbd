//! Configuration
//!
//! `VersioningConfig` is assembled by the `config` crate from built-in
//! defaults, the user's global file, an optional explicit file and the
//! `CCNV__*` environment overlay, in increasing precedence.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-round fetch timeout.
pub const DEFAULT_ROUND_TIMEOUT_MS: u64 = 4000;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersioningConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Highest-version discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// How long one discovery round waits for an answer.
    #[serde(default = "default_round_timeout_ms")]
    pub round_timeout_ms: u64,
}

fn default_round_timeout_ms() -> u64 {
    DEFAULT_ROUND_TIMEOUT_MS
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            round_timeout_ms: default_round_timeout_ms(),
        }
    }
}

impl ResolverConfig {
    pub fn round_timeout(&self) -> Duration {
        Duration::from_millis(self.round_timeout_ms)
    }
}

impl VersioningConfig {
    /// Reject values that deserialize but cannot be used.
    pub fn validate(&self) -> Result<(), crate::error::VersionError> {
        if self.resolver.round_timeout_ms == 0 {
            return Err(crate::error::VersionError::ConfigError(
                "resolver.round_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
