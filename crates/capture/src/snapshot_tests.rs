// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::run::{RunCommand, RunOutcome};
use rstest::rstest;
use std::time::Duration;
use topdiff_oracle::{Capture, Role};

const BASELINE: &str = "\
  PID  %CPU  %SYS    P   Mcycle   Minstr  IPC  %MISS  %BMIS  %BUS COMMAND
 2431   1.2   0.3    2   123.45   200.12 1.62   0.31   0.12   0.1 firefox
 2502   2.0   0.5    1    98.10    80.44 0.82   1.10   0.40     ? chrome
";

const CANDIDATE: &str = "\
  PID  %CPU  %SYS    P   Mcycle   Minstr  IPC  %MISS  %BMIS  %BUS COMMAND THR
 2431   1.1   0.3    2   120.02   198.40 1.65   0.30   0.12   0.1 firefox   4
 2502   2.0   0.5    1    98.10    80.44 0.82   1.10   0.40   0.2 chrome   11
";

fn identifiers() -> Vec<ProcessId> {
    vec!["firefox".into(), "chrome".into()]
}

fn snapshot() -> Snapshot {
    let ids = identifiers();
    let captures = CaptureSet::new(
        Capture::from_text(BASELINE).extract(&ids),
        Capture::from_text(CANDIDATE).extract(&ids),
    );
    Snapshot::new(captures, ids).with_runs(vec![CaptureRun {
        seq: 0,
        started_at: Utc::now(),
        elapsed: Duration::from_millis(1500),
        role: Role::Baseline,
        command: RunCommand::new("old/tiptop", ["-b", "-c", "-n", "10"]),
        outcome: RunOutcome::Exited {
            code: Some(0),
            lines: 3,
        },
    }])
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    let original = snapshot();

    original.save(&path).unwrap();
    let loaded = Snapshot::load(&path).unwrap();

    assert_eq!(loaded, original);
    assert_eq!(loaded.captures.candidate.len(), 2);
    assert!(loaded.captures.extra.is_none());
}

#[test]
fn test_json_layout() {
    let json: serde_json::Value = serde_json::from_str(&snapshot().to_json().unwrap()).unwrap();

    assert_eq!(json["identifiers"][0], "firefox");
    assert_eq!(json["captures"]["baseline"]["chrome"][9], "?");
    assert_eq!(json["captures"]["candidate"]["firefox"][11], "4");
    assert_eq!(json["runs"][0]["elapsed"], 1500);
}

#[test]
fn test_runs_default_to_empty() {
    let json = r#"{
        "captured_at": "2026-03-01T12:00:00Z",
        "identifiers": ["firefox"],
        "captures": { "baseline": {}, "candidate": {} }
    }"#;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.json");
    std::fs::write(&path, json).unwrap();

    let loaded = Snapshot::load(&path).unwrap();

    assert!(loaded.runs.is_empty());
    assert!(loaded.captures.baseline.is_empty());
}

#[rstest]
#[case::missing(None)]
#[case::malformed(Some("{ not json"))]
fn test_load_errors(#[case] content: Option<&str>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    if let Some(content) = content {
        std::fs::write(&path, content).unwrap();
    }

    let err = Snapshot::load(&path).unwrap_err();

    match content {
        None => assert!(matches!(err, SnapshotError::Read { .. })),
        Some(_) => assert!(matches!(err, SnapshotError::Parse { .. })),
    }
    assert!(err.to_string().contains("snapshot.json"));
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope").join("snapshot.json");

    let err = snapshot().save(&path).unwrap_err();

    assert!(matches!(err, SnapshotError::Write { .. }));
}
