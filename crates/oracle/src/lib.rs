// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output regression oracle for top-style process monitors.
//!
//! Pulls one whitespace-split record per tracked workload out of a batch
//! capture, cuts records to a shared field count, and compares a baseline
//! build against a candidate build position by position. A candidate may
//! fix an unknown value but must never introduce or keep one.

mod anomaly;
mod compare;
mod config;
mod record;
mod report;
mod schema;
mod verify;

pub use anomaly::{
    scan, scan_set, AnomalyFinding, MarkerHit, MarkerSet, Scan, PLACEHOLDER_MARKER,
    UNKNOWN_MARKER,
};
pub use compare::{
    compare, Classification, Comparator, Comparison, ComparisonCounts, EntryOutcome,
    LengthMismatch, PositionFinding, RecordComparison, Side,
};
pub use config::{
    AddedColumn, ConfigError, Role, RoleSchema, SchemaConfig, VerifyConfig, DEFAULT_FIELD_COUNT,
};
pub use record::{extract, Capture, ProcessId, Record, RecordSet};
pub use report::{comparison_lines, CheckOutcome, CheckStatus, ComparisonLines, Verdict};
pub use schema::{
    check_shape, layouts, normalize, normalize_set, Normalized, NormalizedSet, ShapeViolation,
};
pub use verify::{
    schema_check_name, verify, CaptureSet, ColumnViolation, SchemaAddition, CHECK_ADDED_COLUMN,
    CHECK_ADDITIONS, CHECK_ANOMALIES, CHECK_ENTRIES, CHECK_ROW_LENGTHS,
};
