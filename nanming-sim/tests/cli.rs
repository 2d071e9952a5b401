// Command::cargo_bin is deprecated in newer assert_cmd releases in favour of a
// macro that needs build-dir setup; keep the function form.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn sim() -> Command {
    let mut cmd = Command::cargo_bin("nanming-sim").unwrap();
    cmd.arg("--log-level").arg("warn");
    cmd
}

#[test]
fn test_help_flag() {
    sim()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--expense-model"))
        .stdout(predicate::str::contains("--choice"));
}

#[test]
fn test_one_year_headless() {
    sim()
        .args(["--months", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== 1645.4 ==="))
        .stdout(predicate::str::contains("chose:"));
}

#[test]
fn test_final_event_left_pending() {
    sim()
        .args(["--months", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== 1644.5 ==="))
        .stdout(predicate::str::contains("Pending:   "));
}

#[test]
fn test_invalid_pay_scale_is_rejected() {
    sim()
        .args(["--pay-scale", "0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pay scale"));
}

#[test]
fn test_missing_catalog_fails() {
    sim()
        .args(["--catalog", "/nonexistent/catalog.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/catalog.json"));
}

#[test]
fn test_list_catalog_round_trips_through_file() {
    let output = sim().arg("--list-catalog").output().unwrap();
    assert!(output.status.success());
    let json = String::from_utf8(output.stdout).unwrap();
    assert!(json.contains("EVENT_01"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, json).unwrap();

    sim()
        .arg("--catalog")
        .arg(&path)
        .args(["--months", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== 1644.6 ==="));
}

#[test]
fn test_event_log_and_snapshot_files() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("chronicle.jsonl");
    let snapshot_path = dir.path().join("final.json");

    sim()
        .args(["--months", "3", "--choice", "last"])
        .arg("--event-log")
        .arg(&log_path)
        .arg("--snapshot-out")
        .arg(&snapshot_path)
        .assert()
        .success();

    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("\"type\":\"month_settled\""));
    assert!(log.contains("\"type\":\"event_triggered\""));
    assert!(log.contains("\"type\":\"event_resolved\""));
    for line in log.lines() {
        serde_json::from_str::<serde_json::Value>(line).unwrap();
    }

    let snapshot: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&snapshot_path).unwrap()).unwrap();
    assert_eq!(snapshot["tick"], 3);
    assert_eq!(snapshot["date"]["month"], 7);
}

#[test]
fn test_realtime_mode_settles_months() {
    sim()
        .args(["--realtime", "--tick-ms", "5", "--months", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== 1644.7 ==="));
}
