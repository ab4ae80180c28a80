//! Tests for schema-level row validation

use super::*;
use crate::Error;
use crate::row::{HeaderRow, Row};
use crate::schema::{Schema, ValidationReport};
use crate::value::{TypedValue, ValueConverter};
use serde_json::json;
use std::sync::Arc;

fn people_schema() -> Schema {
    Schema::new([
        create_column("id", json!({"type": "integer", "constraints": {"required": true}})),
        create_column("name", json!({"constraints": {"required": true, "maxLength": 5}})),
        create_column("active", json!({"type": "boolean"})),
    ])
}

fn people_row(cells: &[&str]) -> Row {
    let header = Arc::new(HeaderRow::new(["id", "name", "active"]));
    Row::new(cells.iter().copied()).with_header(header)
}

#[test]
fn test_column_lookup_by_id() {
    let schema = people_schema();

    assert_eq!(schema.len(), 3);
    assert_eq!(schema.column("id").unwrap().type_name(), "integer");
    assert!(schema.column("missing").is_none());
}

#[test]
fn test_from_json_builds_columns_by_key() {
    let schema = Schema::from_json(&json!({
        "id": {"type": "integer"},
        "email": {}
    }))
    .unwrap();

    assert_eq!(schema.column("id").unwrap().type_name(), "integer");
    assert_eq!(schema.column("email").unwrap().type_name(), "string");
    assert!(matches!(
        Schema::from_json(&json!([1, 2])),
        Err(Error::Configuration { .. })
    ));
}

#[test]
fn test_repeated_id_replaces_earlier_column() {
    let schema = Schema::new([
        create_column("id", json!({"type": "integer"})),
        create_column("name", json!({})),
        create_column("id", json!({"type": "string"})),
    ]);

    assert_eq!(schema.len(), 2);
    assert_eq!(schema.columns()[0].id(), "id");
    assert_eq!(schema.columns()[0].type_name(), "string");
}

#[test]
fn test_valid_row_has_empty_report() {
    let report = people_schema().validate_row(&people_row(&["1", "Luke", "yes"]), &ValueConverter::default());

    assert!(report.is_valid());
    assert!(report.into_result().is_ok());
}

#[test]
fn test_violations_accumulate_across_columns() {
    let report = people_schema().validate_row(
        &people_row(&["", "Lucinda", "no"]),
        &ValueConverter::default(),
    );

    assert_eq!(report.len(), 2);
    assert_eq!(report.constraint_names(), vec!["required", "maxLength"]);
    assert_eq!(report.for_column("name").count(), 1);
    assert_eq!(report.for_column("id").next().unwrap().constraint, "required");
}

#[test]
fn test_conversion_failure_reported_as_type() {
    let report = people_schema().validate_row(
        &people_row(&["one", "Luke", "yes"]),
        &ValueConverter::default(),
    );

    assert_eq!(report.constraint_names(), vec!["type"]);
    let violation = &report.violations()[0];
    assert_eq!(violation.column, "id");
    assert_eq!(violation.value, "one");
}

#[test]
fn test_missing_column_validated_as_empty() {
    let header = Arc::new(HeaderRow::new(["id"]));
    let row = Row::new(["7"]).with_header(header);

    let report = people_schema().validate_row(&row, &ValueConverter::default());

    assert_eq!(report.constraint_names(), vec!["required"]);
    assert_eq!(report.violations()[0].column, "name");
}

#[test]
fn test_positional_ids_without_header() {
    let schema = Schema::new([create_column("0", json!({"constraints": {"minLength": 2}}))]);

    let report = schema.validate_row(&Row::new(["x"]), &ValueConverter::default());

    assert_eq!(report.constraint_names(), vec!["minLength"]);
}

#[test]
fn test_first_violation_becomes_error() {
    let report = people_schema().validate_row(&people_row(&["", "Luke", "no"]), &ValueConverter::default());

    match report.into_result() {
        Err(Error::ConstraintViolation(violation)) => assert_eq!(violation.constraint, "required"),
        other => panic!("expected constraint violation, got {:?}", other),
    }
}

#[test]
fn test_merge_reports() {
    let schema = people_schema();
    let converter = ValueConverter::default();

    let mut report = ValidationReport::default();
    report.merge(schema.validate_row(&people_row(&["", "Luke", "no"]), &converter));
    report.merge(schema.validate_row(&people_row(&["2", "Anakin", "no"]), &converter));

    assert_eq!(report.len(), 2);
    assert_eq!(report.into_iter().map(|v| v.column).collect::<Vec<_>>(), vec!["id", "name"]);
}

#[test]
fn test_convert_row_to_typed_values() {
    let values = people_schema()
        .convert_row(&people_row(&["3", "Leia", "off"]), &ValueConverter::default())
        .unwrap();

    assert_eq!(values[0].1.as_number().map(|n| n.as_f64()), Some(3.0));
    assert_eq!(values[1].1, TypedValue::text("Leia"));
    assert_eq!(values[2].1.as_bool(), Some(false));
}

#[test]
fn test_report_serializes_violations() {
    let report = people_schema().validate_row(&people_row(&["", "Luke", "no"]), &ValueConverter::default());

    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["violations"][0]["column"], json!("id"));
    assert_eq!(value["violations"][0]["constraint"], json!("required"));
}
