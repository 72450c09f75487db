use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

/// Run the binary with an isolated config directory and no database URL.
fn cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("policy-tracker").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("POLICY_TRACKER_DATABASE_URL")
        .env_remove("POLICY_TRACKER_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_exits_zero() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("upcoming"));
    cmd(&home).arg("-h").assert().success();
}

#[test]
fn no_arguments_prints_usage_and_fails() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .assert()
        .code(1)
        .stderr(contains("Usage"));
}

#[test]
fn unknown_command_fails() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("purge")
        .assert()
        .code(1)
        .stderr(contains("purge").and(contains("Usage")));
}

#[test]
fn add_without_title_fails_before_connecting() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["add", "--category", "Compliance", "--impact", "High"])
        .assert()
        .code(1)
        .stderr(contains("title is required"));
}

#[test]
fn upcoming_rejects_zero_days() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["upcoming", "--days", "0"])
        .assert()
        .code(1)
        .stderr(contains("--days must be a positive integer"));
}

#[test]
fn export_requires_output() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["export", "--limit", "10"])
        .assert()
        .code(1)
        .stderr(contains("--output is required"));
}

#[test]
fn missing_flag_value_fails() {
    let home = TempDir::new().unwrap();
    cmd(&home).args(["show", "--id"]).assert().code(1);
}

#[test]
fn dry_run_prints_sql() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--dry-run", "list", "--category", "Compliance", "--limit", "3"])
        .assert()
        .success()
        .stdout(contains(
            "where category = 'Compliance' order by effective_date desc, id desc limit 3;",
        ));
}

#[test]
fn dry_run_escapes_quotes() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args([
            "add",
            "--title",
            "Director's memo",
            "--category",
            "Compliance",
            "--impact",
            "Low",
            "--effective-date",
            "2026-04-01",
            "--owner",
            "Ops",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(contains("'Director''s memo'").and(contains("'Ops', '');")));
}

#[test]
fn explicit_config_must_exist() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--config", "/nonexistent/policy-tracker.toml", "--dry-run", "init"])
        .assert()
        .code(1)
        .stderr(contains("Configuration error"));
}
