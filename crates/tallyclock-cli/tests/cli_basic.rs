//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway config file
//! and verify outputs.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command with `--config <path>` and return (code, stdout, stderr).
fn run_cli(config: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "tallyclock-cli", "--", "--config"])
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Config with every reminder enabled and no quiet hours, so results do not
/// depend on the wall clock.
fn write_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
instant_delay_secs = 2

[quiet_hours]
forbidden_hours = []

[project_anchor]
hour = 10
minute = 30

[reminders.timerPassedItsDeadline]
after_secs = 1200
title = "Over the deadline"

[reminders.timerPassedTheDuration]
after_secs = 1500
title = "Planned time is up"

[reminders.noTasksHasBeenAddedSince]
after_secs = 1200
title = "Add a task"

[reminders.projectDeadlineReached]
after_secs = 604800
title = "Deadline next week"
"#,
    )
    .unwrap();
    path
}

fn pending_ids(stdout: &str) -> Vec<String> {
    let parsed: serde_json::Value = serde_json::from_str(stdout).unwrap();
    parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_config_path_uses_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&path, &["config", "path"]);
    assert_eq!(code, 0, "config path failed");
    assert_eq!(stdout.trim(), path.display().to_string());
}

#[test]
fn test_config_init_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let (code, _, _) = run_cli(&path, &["config", "init"]);
    assert_eq!(code, 0, "config init failed");
    assert!(path.exists());

    let (code, _, stderr) = run_cli(&path, &["config", "init"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("already exists"));

    let (_, stdout, _) = run_cli(&path, &["config", "get", "project_anchor.hour"]);
    assert_eq!(stdout.trim(), "10");

    let (code, _, _) = run_cli(&path, &["config", "set", "project_anchor.hour", "8"]);
    assert_eq!(code, 0, "config set failed");
    let (_, stdout, _) = run_cli(&path, &["config", "get", "project_anchor.hour"]);
    assert_eq!(stdout.trim(), "8");
}

#[test]
fn test_config_set_rejects_invalid_hour() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    let (code, _, stderr) = run_cli(&path, &["config", "set", "project_anchor.hour", "25"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("project_anchor.hour"));
}

#[test]
fn test_quiet_hours_check_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let (code, stdout, _) = run_cli(&path, &["quiet-hours", "check", "2024-05-06T23:15:00Z"]);
    assert_eq!(code, 0, "quiet-hours check failed");
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["allowed"], false);
    assert_eq!(report["local_hour"], 23);

    let (_, stdout, _) = run_cli(&path, &["quiet-hours", "check", "2024-05-06T12:00:00Z"]);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["allowed"], true);
}

#[test]
fn test_anchor_sets_time_of_day() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    let (code, stdout, _) = run_cli(&path, &["anchor", "2024-05-06T18:45:10Z"]);
    assert_eq!(code, 0, "anchor failed");
    assert_eq!(stdout.trim(), "2024-05-06T10:30:00+00:00");
}

#[test]
fn test_timer_start_prints_pending_reminders() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    let (code, stdout, _) = run_cli(
        &path,
        &["timer", "start", "--elapsed", "1080", "--deadline", "1200", "--duration", "900"],
    );
    assert_eq!(code, 0, "timer start failed");
    assert_eq!(pending_ids(&stdout), vec!["timerPassedItsDeadline"]);
}

#[test]
fn test_timer_stop_schedules_idle_reminder() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    let (code, stdout, _) = run_cli(&path, &["timer", "stop"]);
    assert_eq!(code, 0, "timer stop failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed[0]["id"], "noTasksHasBeenAddedSince");
    assert_eq!(parsed[0]["content"]["title"], "Add a task");
}

#[test]
fn test_project_add_uses_given_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    let deadline = (chrono::Utc::now() + chrono::Duration::days(30)).to_rfc3339();
    let (code, stdout, _) = run_cli(
        &path,
        &["project", "add", "Launch", &deadline, "--id", "p1"],
    );
    assert_eq!(code, 0, "project add failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed[0]["id"], "p1");
    assert_eq!(parsed[0]["content"]["categoryId"], "projectDeadlineReached");
}

#[test]
fn test_project_delete_cancels_reminder_from_earlier_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    let deadline = (chrono::Utc::now() + chrono::Duration::days(30)).to_rfc3339();

    let (_, stdout, _) = run_cli(&path, &["project", "add", "Launch", &deadline, "--id", "p1"]);
    assert_eq!(pending_ids(&stdout), vec!["p1"]);
    let (_, stdout, _) = run_cli(&path, &["project", "add", "Review", &deadline, "--id", "p2"]);
    assert_eq!(pending_ids(&stdout), vec!["p1", "p2"]);

    let (code, stdout, _) = run_cli(&path, &["project", "delete", "p1"]);
    assert_eq!(code, 0, "project delete failed");
    assert_eq!(pending_ids(&stdout), vec!["p2"]);
    assert!(dir.path().join("pending.json").exists());
}

#[test]
fn test_timer_restart_replaces_reminders_from_earlier_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);

    let (_, stdout, _) = run_cli(
        &path,
        &["timer", "start", "--elapsed", "0", "--deadline", "1200", "--duration", "1500"],
    );
    assert_eq!(
        pending_ids(&stdout),
        vec!["timerPassedItsDeadline", "timerPassedTheDuration"]
    );

    let (code, stdout, _) = run_cli(
        &path,
        &["timer", "start", "--elapsed", "1300", "--deadline", "1200", "--duration", "1500"],
    );
    assert_eq!(code, 0, "timer restart failed");
    assert_eq!(pending_ids(&stdout), vec!["timerPassedTheDuration"]);
}

#[test]
fn test_timer_stop_keeps_project_reminders() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    let deadline = (chrono::Utc::now() + chrono::Duration::days(30)).to_rfc3339();

    run_cli(&path, &["project", "add", "Launch", &deadline, "--id", "p1"]);
    let (_, stdout, _) = run_cli(&path, &["timer", "stop"]);

    let ids = pending_ids(&stdout);
    assert!(ids.contains(&"p1".to_string()));
    assert!(ids.contains(&"noTasksHasBeenAddedSince".to_string()));
}

#[test]
fn test_trigger_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    let (code, _, stderr) = run_cli(&path, &["trigger", "timerPaused"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown reminder key"));
}

#[test]
fn test_dispatch_instant_trigger() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    let (code, stdout, _) = run_cli(
        &path,
        &["dispatch", r#"{"type":"InstantTrigger","key":"timerPassedTheDuration"}"#],
    );
    assert_eq!(code, 0, "dispatch failed");
    assert_eq!(pending_ids(&stdout), vec!["timerPassedTheDuration"]);
}
