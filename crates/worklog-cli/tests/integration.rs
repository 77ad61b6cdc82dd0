#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const VALID_KEY: &str = "sk-test0123456789abcdefghijklmnopqrstuvwxyzABC";

const FILE_VAULT: &str = "worklog:\n  vault: file\n";

/// A fresh root whose key lives in `credentials/api_key`.
fn root() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.yaml"), FILE_VAULT).unwrap();
    dir
}

fn worklog(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("worklog").unwrap();
    cmd.current_dir(dir.path())
        .env("WORKLOG_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

// ---------------------------------------------------------------------------
// worklog show / undo
// ---------------------------------------------------------------------------

#[test]
fn show_on_fresh_root_prints_placeholder() {
    let dir = root();
    worklog(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Daily Work Log"));
}

#[test]
fn show_json_reports_empty_document() {
    let dir = root();
    let output = worklog(&dir).args(["show", "--json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["content"], "");
    assert_eq!(json["has_backup"], false);
}

#[test]
fn show_prints_existing_document_verbatim() {
    let dir = root();
    std::fs::write(
        dir.path().join("worklog.md"),
        "## January 2024\n- Shipped v1 API (Jan 15, 2024)\n",
    )
    .unwrap();
    worklog(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout("## January 2024\n- Shipped v1 API (Jan 15, 2024)\n");
}

#[test]
fn undo_without_backup_fails() {
    let dir = root();
    worklog(&dir)
        .arg("undo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to undo"));
}

#[test]
fn undo_restores_persisted_backup() {
    let dir = root();
    std::fs::write(dir.path().join("worklog.md"), "new\n").unwrap();
    std::fs::write(dir.path().join("worklog.backup.md"), "old\n").unwrap();

    worklog(&dir).arg("undo").assert().success();
    assert_eq!(
        std::fs::read_to_string(dir.path().join("worklog.md")).unwrap(),
        "old\n"
    );
    assert!(!dir.path().join("worklog.backup.md").exists());
    worklog(&dir).arg("undo").assert().failure();
}

// ---------------------------------------------------------------------------
// worklog key
// ---------------------------------------------------------------------------

#[test]
fn key_set_rejects_malformed_keys() {
    let dir = root();
    for bad in ["abc", "sk-tooshort", "sk-has a space in it 0123456789abcdefghij"] {
        worklog(&dir)
            .args(["key", "set", bad])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid API key format"));
    }
    assert!(!dir.path().join("credentials/api_key").exists());
}

#[test]
fn key_lifecycle() {
    let dir = root();
    worklog(&dir)
        .args(["key", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No API key configured"));

    worklog(&dir)
        .args(["key", "set", VALID_KEY])
        .assert()
        .success()
        .stdout(predicate::str::contains("API key saved"));
    assert!(dir.path().join("credentials/api_key").exists());

    let output = worklog(&dir)
        .args(["key", "status", "--json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["configured"], true);

    worklog(&dir).args(["key", "delete"]).assert().success();
    worklog(&dir).args(["key", "delete"]).assert().success();
    assert!(!dir.path().join("credentials/api_key").exists());
}

// ---------------------------------------------------------------------------
// worklog add / report (offline failure paths)
// ---------------------------------------------------------------------------

#[test]
fn add_without_key_fails_with_hint() {
    let dir = root();
    worklog(&dir)
        .args(["add", "Shipped v1 API"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("worklog key set"));
    assert!(!dir.path().join("worklog.md").exists());
}

#[test]
fn add_rejects_too_many_entries() {
    let dir = root();
    worklog(&dir)
        .args(["key", "set", VALID_KEY])
        .assert()
        .success();
    worklog(&dir)
        .args(["add", "a", "b", "c", "d"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too many entries"));
}

#[test]
fn report_rejects_inverted_range() {
    let dir = root();
    worklog(&dir)
        .args(["report", "--from", "2024-02-01", "--to", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date range"));
}

#[test]
fn report_rejects_unknown_style() {
    let dir = root();
    worklog(&dir)
        .args([
            "report", "--from", "2024-01-01", "--to", "2024-01-31", "--style", "weekly",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown report style"));
}

#[test]
fn report_with_empty_window_fails_before_network() {
    let dir = root();
    std::fs::write(
        dir.path().join("worklog.md"),
        "## January 2024\n- Shipped v1 API (Jan 15, 2024)\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        format!("{FILE_VAULT}model:\n  base_url: http://127.0.0.1:1\n"),
    )
    .unwrap();
    worklog(&dir)
        .args(["key", "set", VALID_KEY])
        .assert()
        .success();
    worklog(&dir)
        .args(["report", "--from", "2023-01-01", "--to", "2023-12-31"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no worklog entries found"));
}

// ---------------------------------------------------------------------------
// worklog config
// ---------------------------------------------------------------------------

#[test]
fn config_show_prints_effective_settings() {
    let dir = root();
    worklog(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gpt-4o"))
        .stdout(predicate::str::contains("max_entries: 3"))
        .stdout(predicate::str::contains("vault: file"));
}

#[test]
fn unknown_vault_backend_is_rejected() {
    let dir = root();
    std::fs::write(dir.path().join("config.yaml"), "worklog:\n  vault: s3\n").unwrap();
    worklog(&dir).args(["key", "status"]).assert().failure();
    assert!(!dir.path().join("credentials").exists());
}

#[test]
fn invalid_config_blocks_commands() {
    let dir = root();
    std::fs::write(
        dir.path().join("config.yaml"),
        "worklog:\n  max_entries: 0\n  vault: file\n",
    )
    .unwrap();
    worklog(&dir)
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.yaml has errors"));
    worklog(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stderr(predicate::str::contains("error:"));
}
