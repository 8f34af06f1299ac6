// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Marker tokens and the anomaly scanner.

use crate::record::{ProcessId, Record, RecordSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Printed by the monitor when a value could not be computed.
pub const UNKNOWN_MARKER: &str = "?";
/// Printed by the monitor when a value is unavailable.
pub const PLACEHOLDER_MARKER: &str = "-";

/// Set of tokens that mark a field as not computed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerSet(BTreeSet<String>);

impl MarkerSet {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    /// The monitor's unknown-value and placeholder markers.
    pub fn canonical() -> Self {
        Self::new([UNKNOWN_MARKER, PLACEHOLDER_MARKER])
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::canonical()
    }
}

/// A marker found in a single record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerHit<'a> {
    pub position: usize,
    pub token: &'a str,
}

/// Marker positions of one record, in ascending order.
///
/// Cloning restarts the scan from the clone's current position.
#[derive(Clone, Debug)]
pub struct Scan<'a> {
    fields: std::iter::Enumerate<std::slice::Iter<'a, String>>,
    markers: &'a MarkerSet,
}

impl<'a> Iterator for Scan<'a> {
    type Item = MarkerHit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let markers = self.markers;
        self.fields
            .by_ref()
            .find(|(_, token)| markers.contains(token.as_str()))
            .map(|(position, token)| MarkerHit {
                position,
                token: token.as_str(),
            })
    }
}

/// Scan a record for marker tokens.
pub fn scan<'a>(record: &'a Record, markers: &'a MarkerSet) -> Scan<'a> {
    Scan {
        fields: record.fields().iter().enumerate(),
        markers,
    }
}

/// A marker observed in a record set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyFinding {
    pub id: ProcessId,
    pub position: usize,
    pub token: String,
}

/// Scan every record of a set, ordered by identifier then position.
pub fn scan_set(set: &RecordSet, markers: &MarkerSet) -> Vec<AnomalyFinding> {
    set.iter()
        .flat_map(|(id, record)| {
            scan(record, markers).map(move |hit| AnomalyFinding {
                id: id.clone(),
                position: hit.position,
                token: hit.token.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "anomaly_tests.rs"]
mod tests;
