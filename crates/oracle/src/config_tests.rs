// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use yare::parameterized;

#[test]
fn test_defaults_from_minimal_json() {
    let config: VerifyConfig =
        serde_json::from_str(r#"{ "process_identifiers": ["firefox", "chrome"] }"#).unwrap();

    assert_eq!(config.process_identifiers.len(), 2);
    assert_eq!(config.marker_tokens, MarkerSet::canonical());
    assert_eq!(config.expected_field_count, DEFAULT_FIELD_COUNT);
    assert_eq!(config.schema, SchemaConfig::default());
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_unknown_fields_rejected() {
    let result: Result<VerifyConfig, _> =
        serde_json::from_str(r#"{ "process_identifiers": [], "markers": ["?"] }"#);
    assert!(result.is_err());
}

#[test]
fn test_schema_roles() {
    let config: VerifyConfig = serde_json::from_str(
        r#"{
            "process_identifiers": ["firefox"],
            "schema": {
                "candidate": {
                    "field_count": 12,
                    "added_column": { "name": "threads", "position": 11, "expected": { "firefox": "4" } }
                },
                "extra": { "field_count": 11 }
            }
        }"#,
    )
    .unwrap();

    assert!(config.schema.get(Role::Baseline).is_none());
    let candidate = config.schema.get(Role::Candidate).unwrap();
    assert_eq!(candidate.field_count, 12);
    let column = candidate.added_column.as_ref().unwrap();
    assert_eq!(column.position, 11);
    assert_eq!(column.expected[&ProcessId::from("firefox")], "4");
    assert_eq!(config.schema.get(Role::Extra).unwrap().field_count, 11);
}

#[test]
fn test_validate_rejects_empty_identifiers() {
    let config = VerifyConfig::new(Vec::<&str>::new());
    assert_eq!(config.validate(), Err(ConfigError::NoIdentifiers));
}

#[parameterized(
    empty = { "" },
    spaces = { "   " },
    tab = { "\t" },
)]
fn test_validate_rejects_blank_identifier(id: &str) {
    let config = VerifyConfig::new(["firefox", id]);
    assert_eq!(config.validate(), Err(ConfigError::BlankIdentifier(1)));
}

#[test]
fn test_blank_identifier_from_json_rejected() {
    let config: VerifyConfig =
        serde_json::from_str(r#"{ "process_identifiers": [""] }"#).unwrap();
    let err = config.validate().unwrap_err();
    assert_eq!(err.to_string(), "process identifier at index 0 is blank");
}

#[test]
fn test_validate_rejects_empty_markers() {
    let mut config = VerifyConfig::new(["firefox"]);
    config.marker_tokens = MarkerSet::new(Vec::<String>::new());
    assert_eq!(config.validate(), Err(ConfigError::NoMarkers));
}

#[test]
fn test_validate_rejects_zero_field_count() {
    let mut config = VerifyConfig::new(["firefox"]);
    config.schema.extra = Some(RoleSchema::new(0));
    assert_eq!(config.validate(), Err(ConfigError::ZeroFieldCount("extra")));
}

#[test]
fn test_validate_rejects_column_outside_schema() {
    let mut config = VerifyConfig::new(["firefox"]);
    config.schema.candidate =
        Some(RoleSchema::new(12).with_added_column(AddedColumn::new("threads", 12)));

    let err = config.validate().unwrap_err();

    assert!(matches!(err, ConfigError::ColumnOutOfRange { position: 12, .. }));
    assert_eq!(
        err.to_string(),
        "added column 'threads' at position 12 is outside the candidate schema of 12 fields"
    );
}

#[test]
fn test_role_display() {
    assert_eq!(Role::Baseline.to_string(), "baseline");
    assert_eq!(Role::Extra.as_str(), "extra");
}
