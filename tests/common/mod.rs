//! Shared testing utilities for recipes-infra CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing harness providing an isolated working directory for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        Self { root }
    }

    /// Directory the CLI runs in.
    pub fn work_dir(&self) -> &Path {
        self.root.path()
    }

    /// Build a command for invoking the compiled binary with a clean `IMAGE_TAG`.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("recipes-infra").expect("Failed to locate binary");
        cmd.current_dir(self.work_dir()).env_remove("IMAGE_TAG").env_remove("RUST_LOG");
        cmd
    }

    /// Write a stack config file and return its path.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.work_dir().join("stack.toml");
        fs::write(&path, content).expect("Failed to write stack config");
        path
    }

    /// Path of the default JSON manifest.
    pub fn default_manifest_path(&self) -> PathBuf {
        self.work_dir().join("manifest.out").join("Hw2Stack.manifest.json")
    }

    /// Parse the default JSON manifest.
    pub fn read_manifest(&self) -> serde_json::Value {
        let content =
            fs::read_to_string(self.default_manifest_path()).expect("manifest should exist");
        serde_json::from_str(&content).expect("manifest should be valid JSON")
    }
}
