//! Shared helpers for integration tests.

use ccnv::{ContentObject, Name, VersionStamp};
use parking_lot::Mutex;
use tempfile::TempDir;

/// Realistic base time; stamps near it encode to six value bytes.
pub const BASE_SECS: i64 = 1_700_000_000;

pub fn stamp(offset_secs: i64) -> Vec<u8> {
    VersionStamp::from_time(BASE_SECS + offset_secs, 0)
        .unwrap()
        .encode()
}

pub fn name(components: &[&str]) -> Name {
    Name::from_components(components.iter().copied())
}

/// `prefix/<version>/seg0` as a data object.
pub fn segment(prefix: &Name, version: &[u8]) -> ContentObject {
    let mut name = prefix.clone();
    name.append(version);
    name.append(b"seg0");
    ContentObject::data(name, b"payload".to_vec())
}

/// `prefix/<version>`
pub fn with_version(prefix: &Name, version: &[u8]) -> Name {
    let mut name = prefix.clone();
    name.append(version);
    name
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with XDG_CONFIG_HOME pointing into `temp_dir` and `vars` set,
/// restoring the environment afterwards.
pub fn with_config_env<F, R>(temp_dir: &TempDir, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_LOCK.lock();
    let config_home = temp_dir.path().join("config");
    std::fs::create_dir_all(&config_home).unwrap();

    let mut saved: Vec<(String, Option<String>)> = Vec::new();
    let config_home_str = config_home.to_string_lossy().to_string();
    let all_vars = std::iter::once(("XDG_CONFIG_HOME", config_home_str.as_str()))
        .chain(vars.iter().copied());
    for (key, value) in all_vars {
        saved.push((key.to_string(), std::env::var(key).ok()));
        std::env::set_var(key, value);
    }

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

    for (key, value) in saved {
        match value {
            Some(value) => std::env::set_var(&key, value),
            None => std::env::remove_var(&key),
        }
    }
    match result {
        Ok(r) => r,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
