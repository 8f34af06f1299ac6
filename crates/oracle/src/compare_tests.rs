// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use proptest::prelude::*;
use yare::parameterized;

fn set(rows: &[(&str, &str)]) -> RecordSet {
    rows.iter()
        .map(|(id, line)| (ProcessId::from(*id), Record::from_line(line)))
        .collect()
}

fn markers() -> MarkerSet {
    MarkerSet::canonical()
}

#[parameterized(
    persisted_unknown = { "?", "?", Classification::AnomalyPersisted },
    persisted_placeholder = { "-", "-", Classification::AnomalyPersisted },
    persisted_other_marker = { "?", "-", Classification::AnomalyPersisted },
    resolved = { "?", "250", Classification::AnomalyResolved },
    introduced = { "500", "?", Classification::AnomalyIntroduced },
    introduced_placeholder = { "500", "-", Classification::AnomalyIntroduced },
    value_changed = { "1.2", "1.1", Classification::ValueChanged },
    unchanged = { "S", "S", Classification::Unchanged },
)]
fn classify_pairs(baseline: &str, candidate: &str, expected: Classification) {
    assert_eq!(
        Classification::classify(baseline, candidate, &markers()),
        expected
    );
}

#[test]
fn test_classification_is_not_symmetric() {
    let m = markers();
    assert_eq!(
        Classification::classify("?", "7", &m),
        Classification::AnomalyResolved
    );
    assert_eq!(
        Classification::classify("7", "?", &m),
        Classification::AnomalyIntroduced
    );
}

#[test]
fn test_failure_and_informational_partition() {
    assert!(Classification::AnomalyIntroduced.is_failure());
    assert!(Classification::AnomalyPersisted.is_failure());
    assert!(!Classification::AnomalyResolved.is_failure());
    assert!(!Classification::ValueChanged.is_failure());
    assert!(Classification::AnomalyResolved.is_informational());
    assert!(Classification::ValueChanged.is_informational());
    assert!(!Classification::Unchanged.is_informational());
}

#[test]
fn test_resolved_unknown_passes() {
    let baseline = set(&[("firefox", "firefox 1.2 S 0 4 ? 1000")]);
    let candidate = set(&[("firefox", "firefox 1.1 S 0 4 250 1000")]);

    let comparison = compare(&baseline, &candidate, &markers());

    let id = ProcessId::from("firefox");
    assert_eq!(
        comparison.classification(&id, 5),
        Some(Classification::AnomalyResolved)
    );
    assert_eq!(
        comparison.classification(&id, 1),
        Some(Classification::ValueChanged)
    );
    assert!(comparison.passed());
}

#[test]
fn test_introduced_unknown_fails() {
    let baseline = set(&[("chrome", "chrome 2.0 R 0 8 500")]);
    let candidate = set(&[("chrome", "chrome 2.1 R 0 8 ?")]);

    let comparison = compare(&baseline, &candidate, &markers());

    assert_eq!(
        comparison.classification(&"chrome".into(), 5),
        Some(Classification::AnomalyIntroduced)
    );
    assert!(!comparison.passed());
}

#[test]
fn test_persisted_placeholder_fails() {
    let row = "sshd 0.0 S 0 1 -";
    let baseline = set(&[("sshd", row)]);
    let candidate = set(&[("sshd", row)]);

    let comparison = compare(&baseline, &candidate, &markers());

    assert_eq!(
        comparison.classification(&"sshd".into(), 5),
        Some(Classification::AnomalyPersisted)
    );
    assert!(!comparison.passed());
}

#[test]
fn test_missing_candidate_entry_fails() {
    let row = "cron 0.0 S";
    let baseline = set(&[("cron", row), ("sshd", "sshd 0.0 S")]);
    let candidate = set(&[("sshd", "sshd 0.0 S")]);

    let comparison = compare(&baseline, &candidate, &markers());

    assert_eq!(
        comparison.get(&"cron".into()),
        Some(&EntryOutcome::Missing {
            from: Side::Candidate
        })
    );
    assert!(comparison.get(&"sshd".into()).unwrap().passed());
    assert!(!comparison.passed());
    assert_eq!(comparison.counts().missing, 1);
}

#[test]
fn test_expected_identifier_missing_from_both() {
    let comparison = Comparator::new(markers())
        .require([ProcessId::from("atd")])
        .compare(&RecordSet::new(), &RecordSet::new());

    assert_eq!(
        comparison.missing().collect::<Vec<_>>(),
        vec![(&ProcessId::from("atd"), Side::Both)]
    );
    assert!(!comparison.passed());
}

#[test]
fn test_missing_baseline_entry() {
    let candidate = set(&[("nginx", "nginx 0.1")]);

    let comparison = compare(&RecordSet::new(), &candidate, &markers());

    assert_eq!(
        comparison.missing().collect::<Vec<_>>(),
        vec![(&ProcessId::from("nginx"), Side::Baseline)]
    );
}

#[test]
fn test_length_mismatch_compares_overlap() {
    let baseline = set(&[("firefox", "firefox 1.2 ?")]);
    let candidate = set(&[("firefox", "firefox 1.2 7 4 x")]);

    let comparison = compare(&baseline, &candidate, &markers());

    let (_, record) = comparison.compared().next().unwrap();
    assert_eq!(record.positions.len(), 3);
    assert_eq!(
        record.positions[2].classification,
        Classification::AnomalyResolved
    );
    let mismatch = record.length_mismatch.as_ref().unwrap();
    assert_eq!(mismatch.baseline_len, 3);
    assert_eq!(mismatch.candidate_len, 5);
    assert_eq!(mismatch.excess, ["4", "x"]);
    assert_eq!(mismatch.longer(), Side::Candidate);
    assert!(!comparison.passed());
    assert_eq!(comparison.counts().length_mismatch, 1);
}

#[test]
fn test_collects_every_finding() {
    let baseline = set(&[
        ("a", "a 1 ? -"),
        ("b", "b 2 3 4"),
    ]);
    let candidate = set(&[
        ("a", "a 1 - 5"),
        ("b", "b ? 3 -"),
    ]);

    let counts = compare(&baseline, &candidate, &markers()).counts();

    assert_eq!(counts.anomaly_persisted, 1);
    assert_eq!(counts.anomaly_resolved, 1);
    assert_eq!(counts.anomaly_introduced, 2);
    assert_eq!(counts.unchanged, 4);
}

#[test]
fn test_empty_sets_pass() {
    let comparison = compare(&RecordSet::new(), &RecordSet::new(), &markers());
    assert!(comparison.is_empty());
    assert!(comparison.passed());
}

#[test]
fn test_comparison_serializes_outcomes() {
    let baseline = set(&[("cron", "cron"), ("sshd", "sshd -")]);
    let candidate = set(&[("sshd", "sshd 1")]);

    let json = serde_json::to_value(compare(&baseline, &candidate, &markers())).unwrap();

    assert_eq!(json["entries"]["cron"]["outcome"], "missing");
    assert_eq!(json["entries"]["cron"]["from"], "candidate");
    assert_eq!(json["entries"]["sshd"]["outcome"], "compared");
    assert_eq!(
        json["entries"]["sshd"]["positions"][1]["classification"],
        "anomaly_resolved"
    );
}

proptest! {
    #[test]
    fn self_comparison_is_unchanged(
        rows in proptest::collection::btree_map(
            "[a-z]{1,8}",
            proptest::collection::vec("[0-9.SR]{1,4}", 0..12),
            0..8,
        ),
    ) {
        let x: RecordSet = rows
            .into_iter()
            .map(|(id, fields)| (ProcessId::new(id), fields.into_iter().collect::<Record>()))
            .collect();

        let comparison = compare(&x, &x, &MarkerSet::canonical());
        let counts = comparison.counts();

        prop_assert!(comparison.passed());
        prop_assert_eq!(counts.anomaly_resolved + counts.anomaly_introduced, 0);
        prop_assert_eq!(counts.anomaly_persisted + counts.value_changed, 0);
        prop_assert_eq!(counts.missing + counts.length_mismatch, 0);
    }

    #[test]
    fn identical_markers_always_persist(marker in prop_oneof![Just("?"), Just("-")]) {
        prop_assert_eq!(
            Classification::classify(marker, marker, &MarkerSet::canonical()),
            Classification::AnomalyPersisted
        );
    }
}
