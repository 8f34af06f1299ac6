// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Verification of a baseline/candidate capture pair.

use crate::anomaly::{scan_set, AnomalyFinding};
use crate::compare::Comparator;
use crate::config::{AddedColumn, Role, VerifyConfig};
use crate::record::{ProcessId, RecordSet};
use crate::report::{CheckOutcome, Verdict};
use crate::schema::{check_shape, normalize_set, NormalizedSet, ShapeViolation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const CHECK_ENTRIES: &str = "entries_present";
pub const CHECK_ANOMALIES: &str = "no_anomaly_regression";
pub const CHECK_ROW_LENGTHS: &str = "row_lengths";
pub const CHECK_ADDITIONS: &str = "schema_additions";
pub const CHECK_ADDED_COLUMN: &str = "added_column";

/// Record sets of one capture run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSet {
    pub baseline: RecordSet,
    pub candidate: RecordSet,
    /// Candidate build in thread mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<RecordSet>,
}

impl CaptureSet {
    pub fn new(baseline: RecordSet, candidate: RecordSet) -> Self {
        Self {
            baseline,
            candidate,
            extra: None,
        }
    }

    pub fn with_extra(mut self, extra: RecordSet) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn get(&self, role: Role) -> Option<&RecordSet> {
        match role {
            Role::Baseline => Some(&self.baseline),
            Role::Candidate => Some(&self.candidate),
            Role::Extra => self.extra.as_ref(),
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = (Role, &RecordSet)> {
        [Role::Baseline, Role::Candidate, Role::Extra]
            .into_iter()
            .filter_map(|role| self.get(role).map(|set| (role, set)))
    }
}

/// A token past the compared prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaAddition {
    pub role: Role,
    pub id: ProcessId,
    pub position: usize,
    pub token: String,
    /// The row matches its declared layout and the column check passed.
    pub expected: bool,
}

/// An added-column value that failed its check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnViolation {
    pub role: Role,
    pub id: ProcessId,
    pub column: String,
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub reason: String,
}

pub fn schema_check_name(role: Role) -> &'static str {
    match role {
        Role::Baseline => "baseline_schema",
        Role::Candidate => "candidate_schema",
        Role::Extra => "extra_schema",
    }
}

/// Run every check over a capture set.
///
/// Findings are collected for every identifier and role. Nothing stops at
/// the first failure.
pub fn verify(captures: &CaptureSet, config: &VerifyConfig) -> Verdict {
    let expected_len = config.expected_field_count;
    let baseline = normalize_set(&captures.baseline, expected_len);
    let candidate = normalize_set(&captures.candidate, expected_len);

    let comparison = Comparator::new(config.marker_tokens.clone())
        .require(config.process_identifiers.iter().cloned())
        .compare(&baseline.records(), &candidate.records());

    let mut under_length: BTreeMap<Role, Vec<ShapeViolation>> = BTreeMap::new();
    for (role, set) in [(Role::Baseline, &baseline), (Role::Candidate, &candidate)] {
        let short = set.under_length();
        if !short.is_empty() {
            under_length.insert(role, short);
        }
    }

    let mut shape_violations: BTreeMap<Role, Vec<ShapeViolation>> = BTreeMap::new();
    let mut schema_checks = Vec::new();
    for role in [Role::Baseline, Role::Candidate, Role::Extra] {
        let name = schema_check_name(role);
        let outcome = match (config.schema.get(role), captures.get(role)) {
            (None, _) => CheckOutcome::skipped(name, "no layout declared"),
            (Some(_), None) => CheckOutcome::skipped(name, format!("no {} capture", role)),
            (Some(schema), Some(set)) => {
                let violations = check_shape(set, schema.field_count);
                let outcome = if violations.is_empty() {
                    CheckOutcome::pass(name)
                } else {
                    CheckOutcome::fail(
                        name,
                        format!(
                            "{} row(s) not {} fields wide",
                            violations.len(),
                            schema.field_count
                        ),
                    )
                };
                if !violations.is_empty() {
                    shape_violations.insert(role, violations);
                }
                outcome
            }
        };
        schema_checks.push(outcome);
    }

    let column_violations = check_added_columns(captures, config);
    let additions = collect_additions(
        [(Role::Baseline, &baseline), (Role::Candidate, &candidate)],
        config,
        &column_violations,
    );

    let anomalies: BTreeMap<Role, Vec<AnomalyFinding>> = captures
        .roles()
        .map(|(role, set)| (role, scan_set(set, &config.marker_tokens)))
        .filter(|(_, findings)| !findings.is_empty())
        .collect();

    let counts = comparison.counts();
    let mut checks = Vec::new();

    let missing: Vec<String> = comparison
        .missing()
        .map(|(id, side)| format!("{} ({})", id, side))
        .collect();
    checks.push(if missing.is_empty() {
        CheckOutcome::pass(CHECK_ENTRIES)
    } else {
        CheckOutcome::fail(CHECK_ENTRIES, format!("missing: {}", missing.join(", ")))
    });

    let regressions = counts.anomaly_introduced + counts.anomaly_persisted;
    checks.push(if regressions == 0 {
        CheckOutcome::pass(CHECK_ANOMALIES)
    } else {
        CheckOutcome::fail(
            CHECK_ANOMALIES,
            format!(
                "{} introduced, {} persisted",
                counts.anomaly_introduced, counts.anomaly_persisted
            ),
        )
    });

    let short: usize = under_length.values().map(Vec::len).sum();
    checks.push(if short == 0 && counts.length_mismatch == 0 {
        CheckOutcome::pass(CHECK_ROW_LENGTHS)
    } else {
        CheckOutcome::fail(
            CHECK_ROW_LENGTHS,
            format!(
                "{} row(s) under {} fields, {} length mismatch(es)",
                short, expected_len, counts.length_mismatch
            ),
        )
    });

    checks.extend(schema_checks);

    let unexpected = additions.iter().filter(|a| !a.expected).count();
    checks.push(if unexpected == 0 {
        CheckOutcome::pass(CHECK_ADDITIONS)
    } else {
        CheckOutcome::fail(
            CHECK_ADDITIONS,
            format!("{} unexpected token(s) beyond {} fields", unexpected, expected_len),
        )
    });

    let declared_columns = config
        .schema
        .roles()
        .into_iter()
        .any(|(role, schema)| {
            schema.is_some_and(|s| s.added_column.is_some()) && captures.get(role).is_some()
        });
    checks.push(if !declared_columns {
        CheckOutcome::skipped(CHECK_ADDED_COLUMN, "no added column declared")
    } else if column_violations.is_empty() {
        CheckOutcome::pass(CHECK_ADDED_COLUMN)
    } else {
        CheckOutcome::fail(
            CHECK_ADDED_COLUMN,
            format!("{} invalid value(s)", column_violations.len()),
        )
    });

    let verdict = Verdict::new(checks, comparison)
        .with_anomalies(anomalies)
        .with_additions(additions)
        .with_shape_violations(shape_violations)
        .with_under_length(under_length)
        .with_column_violations(column_violations);

    tracing::debug!(
        passed = verdict.passed,
        identifiers = config.process_identifiers.len(),
        "verified captures"
    );
    verdict
}

fn check_added_columns(captures: &CaptureSet, config: &VerifyConfig) -> Vec<ColumnViolation> {
    let mut violations = Vec::new();
    for (role, schema) in config.schema.roles() {
        let (Some(schema), Some(set)) = (schema, captures.get(role)) else {
            continue;
        };
        let Some(column) = &schema.added_column else {
            continue;
        };
        for (id, record) in set.iter() {
            let token = record.get(column.position);
            if let Some(reason) = column_problem(column, id, token, config) {
                violations.push(ColumnViolation {
                    role,
                    id: id.clone(),
                    column: column.name.clone(),
                    position: column.position,
                    token: token.map(str::to_string),
                    reason,
                });
            }
        }
    }
    violations
}

fn column_problem(
    column: &AddedColumn,
    id: &ProcessId,
    token: Option<&str>,
    config: &VerifyConfig,
) -> Option<String> {
    let Some(token) = token else {
        return Some("column absent".to_string());
    };
    if config.marker_tokens.contains(token) {
        return Some("marker instead of a value".to_string());
    }
    match token.parse::<u64>() {
        Ok(0) | Err(_) => return Some("not a positive integer".to_string()),
        Ok(_) => {}
    }
    match column.expected.get(id) {
        Some(expected) if expected != token => Some(format!("expected {}", expected)),
        _ => None,
    }
}

fn collect_additions<'a>(
    sets: impl IntoIterator<Item = (Role, &'a NormalizedSet)>,
    config: &VerifyConfig,
    column_violations: &[ColumnViolation],
) -> Vec<SchemaAddition> {
    let rejected: BTreeSet<(Role, &ProcessId, usize)> = column_violations
        .iter()
        .map(|v| (v.role, &v.id, v.position))
        .collect();

    let mut additions = Vec::new();
    for (role, set) in sets {
        let schema = config.schema.get(role);
        for (id, normalized) in set.iter() {
            let declared = schema.is_some_and(|s| s.field_count == normalized.raw_len());
            for (position, token) in normalized.additions() {
                additions.push(SchemaAddition {
                    role,
                    id: id.clone(),
                    position,
                    token: token.to_string(),
                    expected: declared && !rejected.contains(&(role, id, position)),
                });
            }
        }
    }
    additions
}

#[cfg(test)]
#[path = "verify_tests.rs"]
mod tests;
