//! CLI Tooling
//!
//! Command-line interface over the versioning operations: stamp a name,
//! inspect its components, show the discovery template for a bound, and run
//! highest-version discovery against a local catalog of names.

use crate::config::{ConfigLoader, VersioningConfig};
use crate::content::ContentObject;
use crate::create::create_version;
use crate::error::VersionError;
use crate::flags::VersioningFlags;
use crate::logging::LoggingConfig;
use crate::name::Name;
use crate::resolver::VersionResolver;
use crate::stamp::{VersionStamp, VersionTime};
use crate::store::{ContentStore, MemoryContentStore};
use crate::template::TemplateBuilder;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// ccnv - version stamps for content-centric names
#[derive(Parser)]
#[command(name = "ccnv")]
#[command(about = "Create, inspect and discover version stamps on ccnx names")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the name extended with a version stamp
    Stamp {
        /// Name URI, e.g. ccnx:/parc/doc
        uri: String,
        /// Seconds since the epoch (default: now)
        #[arg(long)]
        secs: Option<i64>,
        /// Nanoseconds added to --secs
        #[arg(long, default_value = "0")]
        nanos: u32,
        /// Overwrite a trailing version component
        #[arg(long)]
        replace: bool,
        /// With --replace, require the new stamp to be later
        #[arg(long)]
        high: bool,
    },
    /// List a name's components as JSON, decoding version stamps
    Inspect { uri: String },
    /// Hex of the discovery template bounded by the name's last component
    Template { uri: String },
    /// Find the highest version of a name among the names in a catalog file
    Resolve {
        uri: String,
        /// File with one name URI per line; `#` starts a comment
        #[arg(long)]
        catalog: PathBuf,
        /// Per-round timeout in milliseconds (default: from config)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// CLI context holding the loaded configuration
pub struct CliContext {
    config: VersioningConfig,
}

impl CliContext {
    /// Load configuration and create a context.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, VersionError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self { config })
    }

    pub fn with_config(config: VersioningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VersioningConfig {
        &self.config
    }

    /// Logging configuration with CLI flags folded in.
    pub fn logging_config(&self, cli: &Cli) -> LoggingConfig {
        let mut logging = self.config.logging.clone();
        if let Some(level) = &cli.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &cli.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &cli.log_file {
            logging.file = Some(file.clone());
        }
        logging
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, VersionError> {
        match command {
            Commands::Stamp {
                uri,
                secs,
                nanos,
                replace,
                high,
            } => self.handle_stamp(uri, *secs, *nanos, *replace, *high),
            Commands::Inspect { uri } => self.handle_inspect(uri),
            Commands::Template { uri } => self.handle_template(uri),
            Commands::Resolve {
                uri,
                catalog,
                timeout_ms,
            } => self.handle_resolve(uri, catalog, *timeout_ms),
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| VersionError::ConfigError(e.to_string())),
        }
    }

    fn handle_stamp(
        &self,
        uri: &str,
        secs: Option<i64>,
        nanos: u32,
        replace: bool,
        high: bool,
    ) -> Result<String, VersionError> {
        if high && !replace {
            return Err(VersionError::InvalidArgument(
                "--high only applies together with --replace".to_string(),
            ));
        }
        let mut name = parse_name(uri)?;
        let mut flags = VersioningFlags::empty();
        if replace {
            flags = flags | VersioningFlags::REPLACE;
        }
        if high {
            flags = flags | VersioningFlags::HIGH;
        }
        let time = match secs {
            Some(secs) => VersionTime::At { secs, nanos },
            None => {
                flags = flags | VersioningFlags::NOW;
                VersionTime::Now
            }
        };
        create_version(&mut name, flags, time)?;
        Ok(name.to_string())
    }

    fn handle_inspect(&self, uri: &str) -> Result<String, VersionError> {
        let name = parse_name(uri)?;
        let components: Vec<_> = name
            .components()?
            .into_iter()
            .enumerate()
            .map(|(index, component)| {
                let version = VersionStamp::decode(component).map(|stamp| {
                    json!({
                        "ticks": stamp.ticks(),
                        "time": stamp.to_string(),
                    })
                });
                json!({
                    "index": index,
                    "hex": hex::encode(component),
                    "version": version,
                })
            })
            .collect();
        let output = json!({
            "uri": name.to_string(),
            "ccnb": hex::encode(name.as_bytes()),
            "components": components,
        });
        serde_json::to_string_pretty(&output)
            .map_err(|e| VersionError::InvalidArgument(e.to_string()))
    }

    fn handle_template(&self, uri: &str) -> Result<String, VersionError> {
        let name = parse_name(uri)?;
        let bound = name.last_component()?.ok_or_else(|| {
            VersionError::InvalidArgument("the root name has no component to bound by".to_string())
        })?;
        let mut builder = TemplateBuilder::new();
        Ok(hex::encode(builder.build_for_bound(bound)?.as_bytes()))
    }

    fn handle_resolve(
        &self,
        uri: &str,
        catalog: &Path,
        timeout_ms: Option<u64>,
    ) -> Result<String, VersionError> {
        let mut name = parse_name(uri)?;
        let store = load_catalog(catalog)?;
        let timeout = timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.config.resolver.round_timeout());
        let resolver = VersionResolver::with_timeout(store, timeout);

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let resolution =
            rt.block_on(resolver.resolve_version(&mut name, VersioningFlags::HIGHEST))?;
        info!(name = %name, rounds = resolution.rounds, "Resolved from catalog");

        let output = json!({
            "name": name.to_string(),
            "outcome": resolution.outcome,
            "rounds": resolution.rounds,
            "stop": resolution.stop,
            "version": resolution.version.map(|v| v.to_string()),
        });
        serde_json::to_string_pretty(&output)
            .map_err(|e| VersionError::InvalidArgument(e.to_string()))
    }
}

fn parse_name(uri: &str) -> Result<Name, VersionError> {
    Ok(uri.parse::<Name>()?)
}

/// Seed a store with one empty data object per catalog line.
fn load_catalog(path: &Path) -> Result<MemoryContentStore, VersionError> {
    let text = std::fs::read_to_string(path)?;
    let store = MemoryContentStore::new();
    for line in text.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        store.insert(ContentObject::data(parse_name(line)?, Vec::new()))?;
    }
    Ok(store)
}
