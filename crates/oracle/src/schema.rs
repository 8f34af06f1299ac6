// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-width normalization and row-length checks.
//!
//! The monitor's column layout changes between builds (the thread-count
//! column is the motivating case). Records are cut down to a shared prefix
//! before positional comparison, and the raw lengths are kept because the
//! row length is itself something a test asserts on.

use crate::record::{ProcessId, Record, RecordSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A record cut to an expected field count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Normalized {
    record: Record,
    raw_len: usize,
    expected: usize,
    overflow: Vec<String>,
}

impl Normalized {
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    /// Field count before truncation.
    pub fn raw_len(&self) -> usize {
        self.raw_len
    }

    pub fn expected_len(&self) -> usize {
        self.expected
    }

    /// True when the raw record had fewer fields than expected.
    pub fn is_under_length(&self) -> bool {
        self.raw_len < self.expected
    }

    pub fn is_truncated(&self) -> bool {
        !self.overflow.is_empty()
    }

    /// Tokens dropped by truncation.
    pub fn overflow(&self) -> &[String] {
        &self.overflow
    }

    /// Dropped tokens with their raw positions.
    pub fn additions(&self) -> impl Iterator<Item = (usize, &str)> {
        self.overflow
            .iter()
            .enumerate()
            .map(move |(i, token)| (self.expected + i, token.as_str()))
    }
}

/// Truncate `record` to `expected_len` fields.
///
/// Shorter records are returned unchanged and flagged as under-length.
pub fn normalize(record: Record, expected_len: usize) -> Normalized {
    let raw_len = record.len();
    let (record, overflow) = record.split_at(expected_len);
    Normalized {
        record,
        raw_len,
        expected: expected_len,
        overflow,
    }
}

/// A record set normalized to one field count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedSet(BTreeMap<ProcessId, Normalized>);

impl NormalizedSet {
    pub fn get(&self, id: &ProcessId) -> Option<&Normalized> {
        self.0.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProcessId, &Normalized)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The normalized records as a plain record set.
    pub fn records(&self) -> RecordSet {
        self.0
            .iter()
            .map(|(id, n)| (id.clone(), n.record.clone()))
            .collect()
    }

    /// Records that were shorter than the expected field count.
    pub fn under_length(&self) -> Vec<ShapeViolation> {
        self.0
            .iter()
            .filter(|(_, n)| n.is_under_length())
            .map(|(id, n)| ShapeViolation {
                id: id.clone(),
                expected: n.expected,
                actual: n.raw_len,
            })
            .collect()
    }
}

pub fn normalize_set(set: &RecordSet, expected_len: usize) -> NormalizedSet {
    let normalized: BTreeMap<ProcessId, Normalized> = set
        .iter()
        .map(|(id, record)| (id.clone(), normalize(record.clone(), expected_len)))
        .collect();
    tracing::debug!(
        records = normalized.len(),
        truncated = normalized.values().filter(|n| n.is_truncated()).count(),
        expected_len,
        "normalized records"
    );
    NormalizedSet(normalized)
}

/// A raw record whose length differs from the declared schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeViolation {
    pub id: ProcessId,
    pub expected: usize,
    pub actual: usize,
}

/// Every record whose raw length is not exactly `expected_len`.
pub fn check_shape(set: &RecordSet, expected_len: usize) -> Vec<ShapeViolation> {
    set.iter()
        .filter(|(_, record)| record.len() != expected_len)
        .map(|(id, record)| ShapeViolation {
            id: id.clone(),
            expected: expected_len,
            actual: record.len(),
        })
        .collect()
}

/// Number of records observed per row length.
///
/// More than one entry means the set mixes display layouts.
pub fn layouts(set: &RecordSet) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for (_, record) in set.iter() {
        *counts.entry(record.len()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
