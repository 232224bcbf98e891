//! Integration tests for codepad
//!
//! These run real scripts through the embedded engine via the public API.

use std::fs;

use codepad::{Config, Runner};

mod capabilities;
mod config_loading;
mod limits;
mod typescript;

const FIXTURES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

/// Helper to get fixture file content
pub(crate) fn fixture_source(name: &str) -> String {
    let path = format!("{FIXTURES_PATH}/sources/{name}");
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read fixture {path}: {e}"))
}

/// Runner over the embedded default configuration
pub(crate) fn test_runner() -> Runner {
    Runner::new(Config::default())
}
