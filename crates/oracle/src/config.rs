// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Verification settings.

use crate::anomaly::MarkerSet;
use crate::record::ProcessId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Row width of tiptop's default screen: PID, nine counters, command.
pub const DEFAULT_FIELD_COUNT: usize = 11;

fn default_field_count() -> usize {
    DEFAULT_FIELD_COUNT
}

/// Invalid verification settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no process identifiers configured")]
    NoIdentifiers,

    #[error("process identifier at index {0} is blank")]
    BlankIdentifier(usize),

    #[error("marker set is empty")]
    NoMarkers,

    #[error("{0} field count must be greater than zero")]
    ZeroFieldCount(&'static str),

    #[error(
        "added column '{name}' at position {position} is outside the {role} schema of {field_count} fields"
    )]
    ColumnOutOfRange {
        name: String,
        position: usize,
        role: &'static str,
        field_count: usize,
    },
}

/// Settings the verification pipeline runs under
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VerifyConfig {
    /// Workloads to track, in declaration order
    pub process_identifiers: Vec<ProcessId>,

    /// Tokens the monitor prints for values it could not compute
    #[serde(default)]
    pub marker_tokens: MarkerSet,

    /// Positional contract both captures are cut to before comparison
    #[serde(default = "default_field_count")]
    pub expected_field_count: usize,

    /// Declared raw layouts per capture role
    #[serde(default)]
    pub schema: SchemaConfig,
}

impl VerifyConfig {
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ProcessId>,
    {
        Self {
            process_identifiers: identifiers.into_iter().map(Into::into).collect(),
            marker_tokens: MarkerSet::default(),
            expected_field_count: DEFAULT_FIELD_COUNT,
            schema: SchemaConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.process_identifiers.is_empty() {
            return Err(ConfigError::NoIdentifiers);
        }
        // A blank identifier is a substring of every line, header included.
        if let Some(index) = self
            .process_identifiers
            .iter()
            .position(|id| id.as_str().trim().is_empty())
        {
            return Err(ConfigError::BlankIdentifier(index));
        }
        if self.marker_tokens.is_empty() {
            return Err(ConfigError::NoMarkers);
        }
        if self.expected_field_count == 0 {
            return Err(ConfigError::ZeroFieldCount("expected"));
        }
        for (role, schema) in self.schema.roles() {
            let Some(schema) = schema else { continue };
            if schema.field_count == 0 {
                return Err(ConfigError::ZeroFieldCount(role.as_str()));
            }
            if let Some(column) = &schema.added_column {
                if column.position >= schema.field_count {
                    return Err(ConfigError::ColumnOutOfRange {
                        name: column.name.clone(),
                        position: column.position,
                        role: role.as_str(),
                        field_count: schema.field_count,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Which capture a record set came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Baseline,
    Candidate,
    /// Candidate build in thread mode.
    Extra,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Baseline => "baseline",
            Role::Candidate => "candidate",
            Role::Extra => "extra",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw row layouts declared for each capture
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    #[serde(default)]
    pub baseline: Option<RoleSchema>,
    #[serde(default)]
    pub candidate: Option<RoleSchema>,
    #[serde(default)]
    pub extra: Option<RoleSchema>,
}

impl SchemaConfig {
    pub fn get(&self, role: Role) -> Option<&RoleSchema> {
        match role {
            Role::Baseline => self.baseline.as_ref(),
            Role::Candidate => self.candidate.as_ref(),
            Role::Extra => self.extra.as_ref(),
        }
    }

    pub fn roles(&self) -> [(Role, Option<&RoleSchema>); 3] {
        [
            (Role::Baseline, self.baseline.as_ref()),
            (Role::Candidate, self.candidate.as_ref()),
            (Role::Extra, self.extra.as_ref()),
        ]
    }
}

/// Raw layout of one capture
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RoleSchema {
    /// Exact token count of every row
    pub field_count: usize,

    /// Column this build adds, checked on the raw rows
    #[serde(default)]
    pub added_column: Option<AddedColumn>,
}

impl RoleSchema {
    pub fn new(field_count: usize) -> Self {
        Self {
            field_count,
            added_column: None,
        }
    }

    pub fn with_added_column(mut self, column: AddedColumn) -> Self {
        self.added_column = Some(column);
        self
    }
}

/// A numeric column introduced by a newer build (e.g. thread count)
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AddedColumn {
    pub name: String,
    /// 0-based raw position
    pub position: usize,
    /// Exact values to expect for specific workloads
    #[serde(default)]
    pub expected: BTreeMap<ProcessId, String>,
}

impl AddedColumn {
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
            expected: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
