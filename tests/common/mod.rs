//! Common test infrastructure for tsmend integration tests.
//!
//! Provides:
//! - TestProject: temp directory with a src tree, tsmend config, and a
//!   scripted stand-in checker
//! - Binary runner helpers
//!
//! The stand-in checker replays queued outputs: invocation N prints
//! `checks/N.txt` and exits 1 if the file exists, otherwise it prints
//! nothing and exits 0 (a clean tree). Tests queue exactly the checker
//! outputs their scenario needs.

#![allow(dead_code)] // Not every test file uses every helper

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn tsmend_binary() -> String {
    env!("CARGO_BIN_EXE_tsmend").to_string()
}

const CHECK_SCRIPT: &str = r#"#!/bin/sh
count_file=".check_count"
n=0
[ -f "$count_file" ] && n=$(cat "$count_file")
n=$((n+1))
printf '%s' "$n" > "$count_file"
if [ -f "checks/$n.txt" ]; then
  cat "checks/$n.txt"
  exit 1
fi
exit 0
"#;

/// A temp project with a source tree and a scripted checker.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp project dir");
        let project = Self { dir };
        fs::create_dir_all(project.root().join("src")).expect("create src dir");
        fs::create_dir_all(project.root().join("checks")).expect("create checks dir");
        project.write_file("check.sh", CHECK_SCRIPT);
        project.write_file(
            "tsmend.toml",
            "[checker]\ncommand = [\"sh\", \"check.sh\"]\n",
        );
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn out_dir(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    pub fn write_file(&self, rel: &str, content: &str) {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, content).expect("write project file");
    }

    pub fn read_file(&self, rel: &str) -> String {
        fs::read_to_string(self.root().join(rel)).expect("read project file")
    }

    pub fn file_exists(&self, rel: &str) -> bool {
        self.root().join(rel).exists()
    }

    /// Queue the checker output for invocation `n` (1-based).
    pub fn queue_check(&self, n: usize, text: &str) {
        self.write_file(&format!("checks/{n}.txt"), text);
    }

    /// Run the tsmend binary with the project root as cwd.
    pub fn run_tsmend(&self, args: &[&str]) -> Output {
        Command::new(tsmend_binary())
            .current_dir(self.root())
            .args(args)
            .output()
            .expect("failed to execute tsmend")
    }
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
