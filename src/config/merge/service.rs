//! MergeService: orchestrates sources, applies merge policy, deserializes to VersioningConfig.

use crate::config::sources::{environment, explicit_file, global_file};
use crate::config::VersioningConfig;
use config::ConfigError;
use std::path::Path;
use tracing::debug;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<VersioningConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = match explicit {
            Some(path) => explicit_file::add_to_builder(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        let config: VersioningConfig = config.try_deserialize()?;
        debug!(
            round_timeout_ms = config.resolver.round_timeout_ms,
            explicit = ?explicit,
            "Loaded configuration"
        );
        Ok(config)
    }
}
