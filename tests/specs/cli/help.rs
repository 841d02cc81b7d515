//! CLI surface specs: help and version output (§6).

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_shows_usage() {
    Command::cargo_bin("kit").unwrap().arg("--help").assert().success().stdout(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_prints_version() {
    Command::cargo_bin("kit")
        .unwrap()
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_config_file_fails_with_exit_code_one() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("kit")
        .unwrap()
        .current_dir(dir.path())
        .env("CI", "true")
        .assert()
        .failure()
        .code(1);
}
