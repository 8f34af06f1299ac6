// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One monitor invocation and how it ended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use topdiff_oracle::Role;

/// Command line of a monitor invocation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl RunCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Display for RunCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How a monitor invocation ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Process exited; `lines` is the size of the capture it wrote
    Exited { code: Option<i32>, lines: usize },
    /// Killed after exceeding the configured timeout
    TimedOut { after_secs: u64 },
    /// Could not be spawned or its output could not be read
    Failed { error: String },
}

impl RunOutcome {
    /// Exited with status 0.
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Exited { code: Some(0), .. })
    }
}

/// A recorded monitor invocation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRun {
    /// Position in the run log
    pub seq: u64,
    pub started_at: DateTime<Utc>,
    /// Time since the log was created
    #[serde(with = "crate::duration_serde")]
    pub elapsed: Duration,
    pub role: Role,
    pub command: RunCommand,
    pub outcome: RunOutcome,
}
