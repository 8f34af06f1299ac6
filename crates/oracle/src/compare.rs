// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Positional comparison of a baseline and a candidate record set.
//!
//! A candidate may fix an unknown value the baseline printed, but it must
//! never print a marker where the baseline had a value, and must not keep
//! printing one where the baseline did. Plain value drift is recorded but
//! never fails a run.

use crate::anomaly::MarkerSet;
use crate::record::{ProcessId, Record, RecordSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How one field position changed between baseline and candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Unchanged,
    /// Baseline printed a marker, candidate printed a value.
    AnomalyResolved,
    /// Baseline printed a value, candidate printed a marker.
    AnomalyIntroduced,
    /// Both printed a marker.
    AnomalyPersisted,
    /// Both printed different values.
    ValueChanged,
}

impl Classification {
    pub fn classify(baseline: &str, candidate: &str, markers: &MarkerSet) -> Self {
        match (markers.contains(baseline), markers.contains(candidate)) {
            // A different marker in the candidate is still a marker.
            (true, true) => Self::AnomalyPersisted,
            (true, false) => Self::AnomalyResolved,
            (false, true) => Self::AnomalyIntroduced,
            (false, false) if baseline != candidate => Self::ValueChanged,
            (false, false) => Self::Unchanged,
        }
    }

    /// Fails the run on its own.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::AnomalyIntroduced | Self::AnomalyPersisted)
    }

    /// Recorded in the audit trail without failing the run.
    pub fn is_informational(self) -> bool {
        matches!(self, Self::AnomalyResolved | Self::ValueChanged)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::AnomalyResolved => "anomaly resolved",
            Self::AnomalyIntroduced => "anomaly introduced",
            Self::AnomalyPersisted => "anomaly persisted",
            Self::ValueChanged => "value changed",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification of one field position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionFinding {
    pub position: usize,
    pub classification: Classification,
    pub baseline: String,
    pub candidate: String,
}

/// Which capture holds the longer record or lacks an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Baseline,
    Candidate,
    Both,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Baseline => write!(f, "baseline"),
            Side::Candidate => write!(f, "candidate"),
            Side::Both => write!(f, "baseline and candidate"),
        }
    }
}

/// Records of different lengths; positions past the shorter one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthMismatch {
    pub baseline_len: usize,
    pub candidate_len: usize,
    /// Tokens of the longer record beyond the shorter one's length.
    pub excess: Vec<String>,
}

impl LengthMismatch {
    pub fn longer(&self) -> Side {
        if self.baseline_len > self.candidate_len {
            Side::Baseline
        } else {
            Side::Candidate
        }
    }
}

/// Comparison of two records for one identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordComparison {
    pub baseline: Record,
    pub candidate: Record,
    /// One entry per position in the overlapping range.
    pub positions: Vec<PositionFinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_mismatch: Option<LengthMismatch>,
}

impl RecordComparison {
    pub fn failures(&self) -> impl Iterator<Item = &PositionFinding> {
        self.positions
            .iter()
            .filter(|p| p.classification.is_failure())
    }

    pub fn informational(&self) -> impl Iterator<Item = &PositionFinding> {
        self.positions
            .iter()
            .filter(|p| p.classification.is_informational())
    }

    pub fn passed(&self) -> bool {
        self.length_mismatch.is_none() && self.failures().next().is_none()
    }
}

/// Outcome for one identifier of the comparison universe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntryOutcome {
    Compared(RecordComparison),
    Missing { from: Side },
}

impl EntryOutcome {
    pub fn passed(&self) -> bool {
        match self {
            EntryOutcome::Compared(c) => c.passed(),
            EntryOutcome::Missing { .. } => false,
        }
    }
}

/// Tallies over a whole comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonCounts {
    pub unchanged: usize,
    pub anomaly_resolved: usize,
    pub anomaly_introduced: usize,
    pub anomaly_persisted: usize,
    pub value_changed: usize,
    pub length_mismatch: usize,
    pub missing: usize,
}

/// Result of comparing a baseline and a candidate record set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    entries: BTreeMap<ProcessId, EntryOutcome>,
}

impl Comparison {
    pub fn entries(&self) -> impl Iterator<Item = (&ProcessId, &EntryOutcome)> {
        self.entries.iter()
    }

    pub fn get(&self, id: &ProcessId) -> Option<&EntryOutcome> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// No regression, no missing entry and no length mismatch anywhere.
    pub fn passed(&self) -> bool {
        self.entries.values().all(EntryOutcome::passed)
    }

    /// Classification at one position, if that position was compared.
    pub fn classification(&self, id: &ProcessId, position: usize) -> Option<Classification> {
        match self.entries.get(id)? {
            EntryOutcome::Compared(c) => c.positions.get(position).map(|p| p.classification),
            EntryOutcome::Missing { .. } => None,
        }
    }

    pub fn missing(&self) -> impl Iterator<Item = (&ProcessId, Side)> {
        self.entries.iter().filter_map(|(id, e)| match e {
            EntryOutcome::Missing { from } => Some((id, *from)),
            EntryOutcome::Compared(_) => None,
        })
    }

    pub fn compared(&self) -> impl Iterator<Item = (&ProcessId, &RecordComparison)> {
        self.entries.iter().filter_map(|(id, e)| match e {
            EntryOutcome::Compared(c) => Some((id, c)),
            EntryOutcome::Missing { .. } => None,
        })
    }

    pub fn counts(&self) -> ComparisonCounts {
        let mut counts = ComparisonCounts::default();
        for entry in self.entries.values() {
            let comparison = match entry {
                EntryOutcome::Missing { .. } => {
                    counts.missing += 1;
                    continue;
                }
                EntryOutcome::Compared(c) => c,
            };
            if comparison.length_mismatch.is_some() {
                counts.length_mismatch += 1;
            }
            for p in &comparison.positions {
                match p.classification {
                    Classification::Unchanged => counts.unchanged += 1,
                    Classification::AnomalyResolved => counts.anomaly_resolved += 1,
                    Classification::AnomalyIntroduced => counts.anomaly_introduced += 1,
                    Classification::AnomalyPersisted => counts.anomaly_persisted += 1,
                    Classification::ValueChanged => counts.value_changed += 1,
                }
            }
        }
        counts
    }
}

/// Compares record sets under one marker set.
#[derive(Clone, Debug, Default)]
pub struct Comparator {
    markers: MarkerSet,
    expected: Vec<ProcessId>,
}

impl Comparator {
    pub fn new(markers: MarkerSet) -> Self {
        Self {
            markers,
            expected: Vec::new(),
        }
    }

    /// Identifiers that must be present even if neither capture has them.
    pub fn require<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ProcessId>,
    {
        self.expected.extend(ids);
        self
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn compare(&self, baseline: &RecordSet, candidate: &RecordSet) -> Comparison {
        let universe: BTreeSet<&ProcessId> = baseline
            .ids()
            .chain(candidate.ids())
            .chain(self.expected.iter())
            .collect();

        let entries: BTreeMap<ProcessId, EntryOutcome> = universe
            .into_iter()
            .map(|id| {
                let outcome = match (baseline.get(id), candidate.get(id)) {
                    (Some(b), Some(c)) => EntryOutcome::Compared(self.compare_records(b, c)),
                    (Some(_), None) => EntryOutcome::Missing {
                        from: Side::Candidate,
                    },
                    (None, Some(_)) => EntryOutcome::Missing {
                        from: Side::Baseline,
                    },
                    (None, None) => EntryOutcome::Missing { from: Side::Both },
                };
                (id.clone(), outcome)
            })
            .collect();

        let comparison = Comparison { entries };
        tracing::debug!(
            identifiers = comparison.len(),
            passed = comparison.passed(),
            "compared record sets"
        );
        comparison
    }

    pub fn compare_records(&self, baseline: &Record, candidate: &Record) -> RecordComparison {
        let positions = baseline
            .fields()
            .iter()
            .zip(candidate.fields())
            .enumerate()
            .map(|(position, (b, c))| PositionFinding {
                position,
                classification: Classification::classify(b, c, &self.markers),
                baseline: b.clone(),
                candidate: c.clone(),
            })
            .collect();

        let overlap = baseline.len().min(candidate.len());
        let length_mismatch = (baseline.len() != candidate.len()).then(|| {
            let longer = if baseline.len() > candidate.len() {
                baseline
            } else {
                candidate
            };
            LengthMismatch {
                baseline_len: baseline.len(),
                candidate_len: candidate.len(),
                excess: longer.fields()[overlap..].to_vec(),
            }
        });

        RecordComparison {
            baseline: baseline.clone(),
            candidate: candidate.clone(),
            positions,
            length_mismatch,
        }
    }
}

/// Compare with no identifiers expected beyond those captured.
pub fn compare(baseline: &RecordSet, candidate: &RecordSet, markers: &MarkerSet) -> Comparison {
    Comparator::new(markers.clone()).compare(baseline, candidate)
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod tests;
