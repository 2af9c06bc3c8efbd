use std::fs;

use ccnv::config::{ConfigLoader, DEFAULT_ROUND_TIMEOUT_MS};
use ccnv::VersionError;
use tempfile::TempDir;

use crate::integration::support::with_config_env;

#[test]
fn defaults_apply_without_files() {
    let temp_dir = TempDir::new().unwrap();
    let config = with_config_env(&temp_dir, &[], || ConfigLoader::load().unwrap());
    assert_eq!(config.resolver.round_timeout_ms, DEFAULT_ROUND_TIMEOUT_MS);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn explicit_file_overrides_global_file() {
    let temp_dir = TempDir::new().unwrap();
    with_config_env(&temp_dir, &[], || {
        let global_dir = temp_dir.path().join("config").join("ccnv");
        fs::create_dir_all(&global_dir).unwrap();
        fs::write(
            global_dir.join("config.toml"),
            "[resolver]\nround_timeout_ms = 1234\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let global_only = ConfigLoader::load().unwrap();
        assert_eq!(global_only.resolver.round_timeout_ms, 1234);
        assert_eq!(global_only.logging.level, "debug");

        let explicit = temp_dir.path().join("explicit.toml");
        fs::write(&explicit, "[resolver]\nround_timeout_ms = 250\n").unwrap();
        let merged = ConfigLoader::load_from_file(&explicit).unwrap();
        assert_eq!(merged.resolver.round_timeout_ms, 250);
        assert_eq!(merged.logging.level, "debug");
    });
}

#[test]
fn environment_overrides_files() {
    let temp_dir = TempDir::new().unwrap();
    let explicit = temp_dir.path().join("explicit.toml");
    fs::write(&explicit, "[resolver]\nround_timeout_ms = 250\n").unwrap();

    let config = with_config_env(
        &temp_dir,
        &[("CCNV__RESOLVER__ROUND_TIMEOUT_MS", "75")],
        || ConfigLoader::load_from_file(&explicit).unwrap(),
    );
    assert_eq!(config.resolver.round_timeout_ms, 75);
    assert_eq!(config.resolver.round_timeout().as_millis(), 75);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");
    let err = with_config_env(&temp_dir, &[], || {
        ConfigLoader::load_from_file(&missing).unwrap_err()
    });
    assert!(matches!(err, VersionError::ConfigError(_)));
}

#[test]
fn zero_round_timeout_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let explicit = temp_dir.path().join("explicit.toml");
    fs::write(&explicit, "[resolver]\nround_timeout_ms = 0\n").unwrap();
    let err = with_config_env(&temp_dir, &[], || {
        ConfigLoader::load_from_file(&explicit).unwrap_err()
    });
    assert!(matches!(err, VersionError::ConfigError(_)));
}
