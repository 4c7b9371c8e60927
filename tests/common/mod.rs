//! Shared test infrastructure for integration tests.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throwaway corpus directory the `xspecs` binary is pointed at.
pub struct TestCorpus {
    pub dir: TempDir,
}

impl Default for TestCorpus {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCorpus {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn write_json(&self, rel: &str, value: &Value) {
        self.write_raw(
            rel,
            &serde_json::to_string_pretty(value).expect("serialize fixture"),
        );
    }

    pub fn write_raw(&self, rel: &str, contents: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directory");
        }
        std::fs::write(&path, contents.as_bytes()).expect("write fixture");
    }

    pub fn read_json(&self, rel: &str) -> Value {
        serde_json::from_str(&self.read_raw(rel)).expect("parse document")
    }

    pub fn read_raw(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).expect("read document")
    }

    /// Run `xspecs <command> --corpus <root> <extra...>`.
    pub fn run(&self, command: &str, extra: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_xspecs"))
            .arg(command)
            .arg("--corpus")
            .arg(self.root())
            .args(extra)
            .env_remove("RUST_LOG")
            .output()
            .expect("run xspecs")
    }

    pub fn run_ok(&self, command: &str, extra: &[&str]) -> String {
        let output = self.run(command, extra);
        assert!(
            output.status.success(),
            "xspecs {command} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_json(&self, command: &str) -> Value {
        let stdout = self.run_ok(command, &["--json"]);
        serde_json::from_str(&stdout).expect("parse json report")
    }
}

#[allow(dead_code)]
pub fn assertion(doc: &Value, scenario: usize, index: usize) -> &Value {
    &doc["x-specs"][scenario]["validation"]["assertions"][index]
}
