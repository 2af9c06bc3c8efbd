//! Environment overlay for resolver and logging settings.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};

/// Add environment variable overlay to builder.
/// Applied last, so it overrides both config files.
/// `CCNV__RESOLVER__ROUND_TIMEOUT_MS=500` sets `resolver.round_timeout_ms`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("CCNV")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
