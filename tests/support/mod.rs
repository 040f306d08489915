//! Test support utilities for envseal integration tests.
//!
//! Provides an isolated project directory and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;

#[allow(unused_imports)]
pub use assertions::*;

use std::path::PathBuf;
use tempfile::TempDir;

/// Config that "decrypts" a plaintext store with `cat`.
pub const CAT_CONFIG: &str = "[decryptor]\ncommand = \"cat\"\nargs = []\n";

/// Test environment with an isolated temp directory.
///
/// No process-global state is mutated. Child processes use
/// `.current_dir()` so tests can run in parallel.
pub struct Test {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl Test {
    /// Create an empty test environment with no config file.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create a test environment whose `.envseal.toml` points at a
    /// plaintext store decrypted with `cat`.
    pub fn with_store(name: &str, contents: &str) -> Self {
        let t = Self::new();
        t.write(name, contents);
        t.write(
            ".envseal.toml",
            &format!("store = \"{}\"\n{}", name, CAT_CONFIG),
        );
        t
    }

    /// Write a file into the project directory.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("failed to write test file");
        path
    }

    /// Path of a file in the project directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
