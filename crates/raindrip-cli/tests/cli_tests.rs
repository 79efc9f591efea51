//! Integration tests for the `raindrip` binary.
//!
//! These exercise the CLI through the real binary with `assert_cmd`,
//! using an isolated `XDG_CONFIG_HOME` so the tests never touch the
//! user's credential file and never reach the network: every path tested
//! here fails validation, fails authentication lookup, or runs under
//! `--dry-run`.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command wired to an isolated (empty) config dir.
fn raindrip(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("raindrip").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd.env("HOME", config_home.path());
    cmd
}

/// An isolated config dir pre-seeded with a token, for dry-run paths.
fn logged_in_config() -> TempDir {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join("raindrip");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.json"),
        r#"{"token": "test-token"}"#,
    )
    .unwrap();
    dir
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and static output
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_commands() {
    Command::cargo_bin("raindrip")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("collection"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("raindrip")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("unrecognized")));
}

#[test]
fn schema_outputs_valid_json() {
    let dir = TempDir::new().unwrap();
    let output = raindrip(&dir).arg("schema").output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["schemas"]["RaindropUpdate"].is_object());
    assert!(value["usage_examples"].is_object());
}

// ─────────────────────────────────────────────────────────────────────────────
// Authentication errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn whoami_without_login_fails_with_hint() {
    let dir = TempDir::new().unwrap();
    raindrip(&dir)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"))
        .stderr(predicate::str::contains("hint"))
        .stderr(predicate::str::contains("401"));
}

#[test]
fn error_payload_respects_json_format() {
    let dir = TempDir::new().unwrap();
    raindrip(&dir)
        .args(["--format", "json", "search", "rust"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("\"status\": 401"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Client-side validation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn batch_delete_rejects_malformed_ids() {
    // Fails before any credential lookup or request.
    let dir = TempDir::new().unwrap();
    raindrip(&dir)
        .args(["batch", "delete", "--ids", "1,abc,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ID"))
        .stderr(predicate::str::contains("400"));
}

#[test]
fn batch_update_rejects_invalid_json_patch() {
    let dir = TempDir::new().unwrap();
    raindrip(&dir)
        .args(["batch", "update", "--ids", "1,2", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON"))
        .stderr(predicate::str::contains("escaped for the shell"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Dry run
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn dry_run_batch_delete_reports_without_mutating() {
    let dir = logged_in_config();
    raindrip(&dir)
        .args(["--dry-run", "batch", "delete", "--ids", "1,2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("success: true"))
        .stdout(predicate::str::contains("dry_run: true"))
        .stderr(predicate::str::contains("dry run"));
}

#[test]
fn dry_run_tag_rename_reports_payload() {
    let dir = logged_in_config();
    raindrip(&dir)
        .args(["--dry-run", "tag", "rename", "work", "career"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry_run: true"))
        .stderr(predicate::str::contains("career"));
}

#[test]
fn dry_run_collection_create_returns_stub() {
    let dir = logged_in_config();
    raindrip(&dir)
        .args(["--dry-run", "collection", "create", "Research"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry_run: true"))
        .stderr(predicate::str::contains("Research"));
}

#[test]
fn dry_run_output_in_json_format() {
    let dir = logged_in_config();
    let output = raindrip(&dir)
        .args(["--dry-run", "--format", "json", "delete", "42"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["dry_run"], true);
}
