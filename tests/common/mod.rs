//! Common test utilities for ddev integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's real `config.toml`.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with isolated config storage.
///
/// Each `TestEnv` creates two temporary directories:
/// - `work_dir`: the current directory of every invocation
/// - `data_dir`: holds config.toml (via the `DDEV_DATA_DIR` env var)
///
/// The `ddev()` method returns a `Command` that sets `DDEV_DATA_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub work_dir: TempDir,
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().unwrap(),
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the ddev binary with isolated data directory.
    pub fn ddev(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ddev"));
        cmd.current_dir(self.work_dir.path());
        cmd.env("DDEV_DATA_DIR", self.data_dir.path());
        cmd.env_remove("DDEV_LOG");
        cmd.env_remove("DDEV_JSON");
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }

    /// Get the path of config.toml in this environment.
    pub fn config_path(&self) -> PathBuf {
        self.data_path().join("config.toml")
    }

    /// Write raw text to config.toml.
    pub fn write_config(&self, contents: &str) {
        fs::write(self.config_path(), contents).expect("Failed to write config file");
    }

    /// Read config.toml, or an empty string if it doesn't exist.
    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_path()).unwrap_or_default()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
