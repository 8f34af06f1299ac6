// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture snapshots and monitor run logs.
//!
//! A snapshot stores the record sets extracted from one capture run so the
//! run can be verified later, along with the log of monitor invocations
//! that produced it.

mod duration_serde;
mod log;
mod run;
mod snapshot;

pub use log::RunLog;
pub use run::{CaptureRun, RunCommand, RunOutcome};
pub use snapshot::{Snapshot, SnapshotError};
