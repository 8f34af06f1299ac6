// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run log implementation.

use crate::run::{CaptureRun, RunCommand, RunOutcome};
use chrono::Utc;
use parking_lot::Mutex;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use topdiff_oracle::Role;

/// Log of monitor invocations, shared across capture tasks
pub struct RunLog {
    start: Instant,
    runs: Arc<Mutex<Vec<CaptureRun>>>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
}

impl RunLog {
    /// Create a new in-memory run log
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            runs: Arc::new(Mutex::new(Vec::new())),
            file_writer: None,
        }
    }

    /// Create a run log that also appends to a file (JSONL format)
    pub fn with_file(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            start: Instant::now(),
            runs: Arc::new(Mutex::new(Vec::new())),
            file_writer: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
        })
    }

    /// Record a finished invocation
    pub fn record(&self, role: Role, command: RunCommand, outcome: RunOutcome) -> CaptureRun {
        let mut runs = self.runs.lock();
        let run = CaptureRun {
            seq: runs.len() as u64,
            started_at: Utc::now(),
            elapsed: self.start.elapsed(),
            role,
            command,
            outcome,
        };
        runs.push(run.clone());

        if let Some(ref writer) = self.file_writer {
            use std::io::Write;
            let mut w = writer.lock();
            if let Ok(json) = serde_json::to_string(&run) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }
        run
    }

    /// All recorded runs, in order
    pub fn runs(&self) -> Vec<CaptureRun> {
        self.runs.lock().clone()
    }

    /// Runs that did not exit cleanly
    pub fn find_failures(&self) -> Vec<CaptureRun> {
        self.runs
            .lock()
            .iter()
            .filter(|r| !r.outcome.is_success())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.runs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.lock().is_empty()
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RunLog {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            runs: Arc::clone(&self.runs),
            file_writer: self.file_writer.as_ref().map(Arc::clone),
        }
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
