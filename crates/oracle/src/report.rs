// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Verdicts and their text and markdown renderings.

use crate::anomaly::AnomalyFinding;
use crate::compare::{Comparison, EntryOutcome};
use crate::config::Role;
use crate::schema::ShapeViolation;
use crate::verify::{ColumnViolation, SchemaAddition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of one named check
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail(String),
    /// Not applicable to this run (no layout declared, no capture)
    Skipped(String),
}

/// A named check with its status
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: CheckStatus,
}

impl CheckOutcome {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Pass,
        }
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Fail(detail.into()),
        }
    }

    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Skipped(reason.into()),
        }
    }

    /// Skipped checks count as passed.
    pub fn passed(&self) -> bool {
        !matches!(self.status, CheckStatus::Fail(_))
    }
}

/// Failure and audit lines for a comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComparisonLines {
    pub failures: Vec<String>,
    pub audit: Vec<String>,
}

/// Describe every hard failure and every informational change.
///
/// Identifiers with nothing but unchanged positions produce no lines.
pub fn comparison_lines(comparison: &Comparison) -> ComparisonLines {
    let mut lines = ComparisonLines::default();
    for (id, entry) in comparison.entries() {
        let record = match entry {
            EntryOutcome::Missing { from } => {
                lines.failures.push(format!("{}: missing from {}", id, from));
                continue;
            }
            EntryOutcome::Compared(record) => record,
        };
        for finding in record.failures() {
            lines.failures.push(format!(
                "{} @{}: {} ({} -> {})",
                id, finding.position, finding.classification, finding.baseline, finding.candidate
            ));
        }
        if let Some(mismatch) = &record.length_mismatch {
            lines.failures.push(format!(
                "{}: length mismatch (baseline {} fields, candidate {} fields; {} extra: {})",
                id,
                mismatch.baseline_len,
                mismatch.candidate_len,
                mismatch.longer(),
                mismatch.excess.join(" ")
            ));
        }
        if record.informational().next().is_some() {
            lines
                .audit
                .push(format!("{}: {} -> {}", id, record.baseline, record.candidate));
        }
    }
    lines
}

/// Outcome of verifying one capture set
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: bool,
    pub checks: Vec<CheckOutcome>,
    pub comparison: Comparison,
    #[serde(default)]
    pub anomalies: BTreeMap<Role, Vec<AnomalyFinding>>,
    #[serde(default)]
    pub additions: Vec<SchemaAddition>,
    #[serde(default)]
    pub shape_violations: BTreeMap<Role, Vec<ShapeViolation>>,
    #[serde(default)]
    pub under_length: BTreeMap<Role, Vec<ShapeViolation>>,
    #[serde(default)]
    pub column_violations: Vec<ColumnViolation>,
}

impl Verdict {
    /// A verdict passes when none of its checks failed.
    pub fn new(checks: Vec<CheckOutcome>, comparison: Comparison) -> Self {
        Self {
            passed: checks.iter().all(CheckOutcome::passed),
            checks,
            comparison,
            anomalies: BTreeMap::new(),
            additions: Vec::new(),
            shape_violations: BTreeMap::new(),
            under_length: BTreeMap::new(),
            column_violations: Vec::new(),
        }
    }

    pub fn with_anomalies(mut self, anomalies: BTreeMap<Role, Vec<AnomalyFinding>>) -> Self {
        self.anomalies = anomalies;
        self
    }

    pub fn with_additions(mut self, additions: Vec<SchemaAddition>) -> Self {
        self.additions = additions;
        self
    }

    pub fn with_shape_violations(mut self, violations: BTreeMap<Role, Vec<ShapeViolation>>) -> Self {
        self.shape_violations = violations;
        self
    }

    pub fn with_under_length(mut self, short: BTreeMap<Role, Vec<ShapeViolation>>) -> Self {
        self.under_length = short;
        self
    }

    pub fn with_column_violations(mut self, violations: Vec<ColumnViolation>) -> Self {
        self.column_violations = violations;
        self
    }

    pub fn check(&self, name: &str) -> Option<&CheckOutcome> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Pass/fail per check.
    pub fn scenarios(&self) -> impl Iterator<Item = (&str, bool)> {
        self.checks.iter().map(|c| (c.name.as_str(), c.passed()))
    }

    /// Count checks by status
    pub fn count_by_status(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::from([("pass", 0), ("fail", 0), ("skipped", 0)]);
        for check in &self.checks {
            let key = match check.status {
                CheckStatus::Pass => "pass",
                CheckStatus::Fail(_) => "fail",
                CheckStatus::Skipped(_) => "skipped",
            };
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }

    /// Every line of the plain-text report, section headers included.
    pub fn report_lines(&self) -> Vec<String> {
        let counts = self.count_by_status();
        let mut out = vec![format!(
            "verdict: {} ({} passed, {} failed, {} skipped)",
            if self.passed { "PASS" } else { "FAIL" },
            counts["pass"],
            counts["fail"],
            counts["skipped"]
        )];

        out.push("checks:".to_string());
        for check in &self.checks {
            out.push(match &check.status {
                CheckStatus::Pass => format!("  PASS  {}", check.name),
                CheckStatus::Fail(detail) => format!("  FAIL  {}: {}", check.name, detail),
                CheckStatus::Skipped(reason) => format!("  SKIP  {}: {}", check.name, reason),
            });
        }

        for (title, lines) in self.sections() {
            if lines.is_empty() {
                continue;
            }
            out.push(format!("{}:", title.to_lowercase()));
            out.extend(lines.into_iter().map(|line| format!("  {}", line)));
        }

        out
    }

    pub fn to_text(&self) -> String {
        let mut text = self.report_lines().join("\n");
        text.push('\n');
        text
    }

    /// Generate markdown report
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("# topdiff verdict\n\n");
        md.push_str(&format!(
            "Result: {}\n\n",
            if self.passed { "✅ pass" } else { "❌ fail" }
        ));

        md.push_str("| Check | Status | Detail |\n");
        md.push_str("|-------|--------|--------|\n");
        for check in &self.checks {
            let (icon, detail) = match &check.status {
                CheckStatus::Pass => ("✅", ""),
                CheckStatus::Fail(detail) => ("❌", detail.as_str()),
                CheckStatus::Skipped(reason) => ("⏭️", reason.as_str()),
            };
            md.push_str(&format!("| `{}` | {} | {} |\n", check.name, icon, detail));
        }
        md.push('\n');

        for (title, lines) in self.sections() {
            if lines.is_empty() {
                continue;
            }
            md.push_str(&format!("## {}\n\n", title));
            for line in lines {
                md.push_str(&format!("- `{}`\n", line));
            }
            md.push('\n');
        }

        md
    }

    /// Mirror the report to the log stream.
    pub fn emit(&self) {
        for check in &self.checks {
            match &check.status {
                CheckStatus::Fail(detail) => {
                    tracing::warn!(check = %check.name, %detail, "check failed")
                }
                CheckStatus::Pass => tracing::info!(check = %check.name, "check passed"),
                CheckStatus::Skipped(reason) => {
                    tracing::info!(check = %check.name, %reason, "check skipped")
                }
            }
        }
        let [failures, audit, ..] = self.sections();
        for line in &failures.1 {
            tracing::warn!("{}", line);
        }
        for line in &audit.1 {
            tracing::info!("audit {}", line);
        }
    }

    /// Titled finding sections shared by every report format, in report order.
    fn sections(&self) -> [(&'static str, Vec<String>); 4] {
        let ComparisonLines {
            mut failures,
            audit,
        } = comparison_lines(&self.comparison);
        for (role, violations) in &self.under_length {
            for v in violations {
                failures.push(format!(
                    "{}: under-length {} row ({} of {} fields)",
                    v.id, role, v.actual, v.expected
                ));
            }
        }
        for (role, violations) in &self.shape_violations {
            for v in violations {
                failures.push(format!(
                    "{}: {} row has {} fields, layout declares {}",
                    v.id, role, v.actual, v.expected
                ));
            }
        }
        for v in &self.column_violations {
            failures.push(format!(
                "{} @{}: {} {} {} ({})",
                v.id,
                v.position,
                v.role,
                v.column,
                v.token.as_deref().unwrap_or("<none>"),
                v.reason
            ));
        }

        let additions = self
            .additions
            .iter()
            .map(|a| {
                format!(
                    "{} @{}: {} {} ({})",
                    a.id,
                    a.position,
                    a.role,
                    a.token,
                    if a.expected { "expected" } else { "unexpected" }
                )
            })
            .collect();

        let anomalies = self
            .anomalies
            .iter()
            .flat_map(|(role, findings)| {
                findings
                    .iter()
                    .map(move |f| format!("{} {} @{}: {}", role, f.id, f.position, f.token))
            })
            .collect();

        [
            ("Failures", failures),
            ("Audit", audit),
            ("Schema additions", additions),
            ("Anomalies", anomalies),
        ]
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
