//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::VersioningConfig;
use crate::error::VersionError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<VersioningConfig, VersionError> {
        let config = MergeService::load(None)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `path` layered over the global file.
    pub fn load_from_file(path: &Path) -> Result<VersioningConfig, VersionError> {
        let config = MergeService::load(Some(path))?;
        config.validate()?;
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> VersioningConfig {
        VersioningConfig::default()
    }
}
