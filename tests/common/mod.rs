//! Shared integration-test helpers for running the `mdx-components` binary
//! and locating fixtures.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Returns the path to a test fixture.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Runs the binary with `args` and waits for it to exit.
///
/// Logging environment overrides are cleared so output is deterministic.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mdx-components"))
        .args(args)
        .env_remove("MDX_COMPONENTS_LOG_LEVEL")
        .env_remove("MDX_COMPONENTS_LIBRARY")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run mdx-components")
}

/// Fixture path as `&str` for argument lists.
pub fn fixture_arg(name: &str) -> String {
    fixture_path(name)
        .to_str()
        .expect("non-UTF-8 fixture path")
        .to_string()
}
