//! Integration tests for version creation and highest-version discovery

mod config_loading;
mod resolve_version;
mod stamp_properties;
mod support;
