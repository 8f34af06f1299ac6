// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Captures, records and per-run record sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Workload identifier used to correlate one process across captures.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(String);

impl ProcessId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProcessId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProcessId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Positional field tokens of one monitor output line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Vec<String>);

impl Record {
    /// Split a raw line on runs of whitespace.
    pub fn from_line(line: &str) -> Self {
        line.split_whitespace().collect()
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.0.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rebuild a single-spaced line from the tokens.
    pub fn to_line(&self) -> String {
        self.0.join(" ")
    }

    pub(crate) fn split_at(mut self, len: usize) -> (Self, Vec<String>) {
        let tail = self.0.split_off(len.min(self.0.len()));
        (self, tail)
    }
}

impl<S: Into<String>> FromIterator<S> for Record {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.to_line())
    }
}

/// Raw output of one monitor invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capture {
    lines: Vec<String>,
}

impl Capture {
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Extract the records of the given identifiers from this capture.
    pub fn extract(&self, identifiers: &[ProcessId]) -> RecordSet {
        extract(self.lines(), identifiers)
    }
}

/// Records of one capture keyed by process identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet(BTreeMap<ProcessId, Record>);

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record unless the identifier is already present.
    ///
    /// Returns `false` when an earlier record kept the slot.
    pub fn insert_first(&mut self, id: ProcessId, record: Record) -> bool {
        match self.0.entry(id) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    pub fn get(&self, id: &ProcessId) -> Option<&Record> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &ProcessId) -> bool {
        self.0.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ProcessId> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProcessId, &Record)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ProcessId, Record)> for RecordSet {
    fn from_iter<I: IntoIterator<Item = (ProcessId, Record)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (id, record) in iter {
            set.insert_first(id, record);
        }
        set
    }
}

impl IntoIterator for RecordSet {
    type Item = (ProcessId, Record);
    type IntoIter = std::collections::btree_map::IntoIter<ProcessId, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Build a record set from raw capture lines.
///
/// Each line is claimed by the first declared identifier that occurs in it
/// as a substring and has no record yet. A line claims at most one
/// identifier, so with `["sh", "bash"]` the first `bash` line is recorded
/// under `sh`.
pub fn extract<I, S>(lines: I, identifiers: &[ProcessId]) -> RecordSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = RecordSet::new();
    for line in lines {
        if set.len() == identifiers.len() {
            break;
        }
        let line = line.as_ref();
        let claimed = identifiers
            .iter()
            .find(|id| !set.contains(id) && line.contains(id.as_str()));
        if let Some(id) = claimed {
            set.insert_first(id.clone(), Record::from_line(line));
        }
    }

    tracing::debug!(
        matched = set.len(),
        configured = identifiers.len(),
        "extracted records"
    );
    set
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
