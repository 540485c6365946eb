//! Test support utilities for autologin integration tests.
//!
//! Provides an isolated working directory, command builders and a scripted
//! browser driver.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod driver;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use driver::FakeDriver;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with an isolated working directory.
///
/// Commands run with `.current_dir()` set to `dir`, so the `.env` file, the
/// `logs/` directory and screenshots all land inside it and tests can run
/// in parallel.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create a test environment whose `.env` holds `contents`.
    pub fn with_env_file(contents: &str) -> Self {
        let t = Self::new();
        t.write_env(contents);
        t
    }

    /// Overwrite `.env` in the working directory.
    pub fn write_env(&self, contents: &str) {
        std::fs::write(self.dir.path().join(".env"), contents).expect("failed to write .env");
    }

    /// Path inside the working directory.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}
