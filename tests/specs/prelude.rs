//! Test helpers for black-box `kit` behavioral specifications.
//!
//! Tests invoke the built binary against a generated `tasks.yaml` in a
//! temporary project directory and assert on stdout/stderr/exit code.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A temporary directory holding a `tasks.yaml` and whatever files the
/// scenario under test needs (watch targets, build outputs, ...).
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn new(tasks_yaml: &str) -> Self {
        let project = Self { dir: tempfile::tempdir().expect("tempdir") };
        project.file("tasks.yaml", tasks_yaml);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.dir.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full_path, content).unwrap();
    }

    pub fn read(&self, path: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.dir.path().join(path)).unwrap()
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.dir.path().join(path).exists()
    }

    /// A `kit` command rooted at this project, watcher disabled unless the
    /// scenario explicitly re-enables it.
    pub fn kit(&self) -> Command {
        let mut cmd = Command::cargo_bin("kit").expect("kit binary");
        cmd.current_dir(self.path());
        cmd.env("WATCH", "0");
        cmd.env("CI", "true"); // suppress the interactive renderer in tests
        cmd
    }

    pub fn kit_with_watch(&self) -> Command {
        let mut cmd = Command::cargo_bin("kit").expect("kit binary");
        cmd.current_dir(self.path());
        cmd.env_remove("WATCH");
        cmd.env("CI", "true");
        cmd
    }

    /// A raw `std::process::Command` for scenarios that need to control a
    /// long-running `kit` process directly (spawn, inspect, signal) rather
    /// than block on its exit the way `assert_cmd::Command` does.
    pub fn kit_raw_with_watch(&self) -> std::process::Command {
        use assert_cmd::cargo::CommandCargoExt;
        let mut cmd = std::process::Command::cargo_bin("kit").expect("kit binary");
        cmd.current_dir(self.path());
        cmd.env_remove("WATCH");
        cmd.env("CI", "true");
        cmd
    }
}

pub fn path_buf(project: &Project, name: &str) -> PathBuf {
    project.path().join(name)
}

pub const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Poll `condition` until it's true or `timeout` elapses.
pub fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    false
}
