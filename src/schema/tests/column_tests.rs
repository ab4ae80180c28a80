//! Tests for column construction and per-value constraint evaluation

use super::*;
use crate::Error;
use crate::schema::Constraint;
use crate::value::{TypedValue, ValueKind};
use serde_json::json;

#[test]
fn test_type_defaults_to_string() {
    let column = create_column("id", json!({}));

    assert_eq!(column.type_name(), "string");
    assert_eq!(column.kind(), ValueKind::Text);
    assert!(column.constraints().is_empty());
}

#[test]
fn test_null_properties_are_empty() {
    let column = create_column("id", serde_json::Value::Null);

    assert_eq!(column.type_name(), "string");
}

#[test]
fn test_descriptive_properties() {
    let column = create_column(
        "id",
        json!({"name": "Identifier", "type": "integer", "description": "Primary key"}),
    );

    assert_eq!(column.id(), "id");
    assert_eq!(column.name(), "Identifier");
    assert_eq!(column.type_name(), "integer");
    assert_eq!(column.kind(), ValueKind::Numeric);
    assert_eq!(column.description(), Some("Primary key"));
    assert_eq!(column.title(), None);
    assert_eq!(column.format(), None);
}

#[test]
fn test_name_falls_back_to_id() {
    assert_eq!(create_column("email", json!({})).name(), "email");
}

#[test]
fn test_unknown_keys_are_ignored() {
    let column = create_column(
        "code",
        json!({
            "type": "string",
            "colour": "blue",
            "constraints": {"maxLength": 3, "mustBeShiny": true}
        }),
    );

    assert_eq!(column.constraints().len(), 1);
    assert!(matches!(column.constraint("maxLength"), Some(Constraint::MaxLength(3))));
}

#[test]
fn test_wrong_shape_is_invalid_schema() {
    let result = ColumnSchema::new("code", json!({"constraints": {"maxLength": "three"}}));
    assert!(matches!(result, Err(Error::InvalidSchema { column, .. }) if column == "code"));

    assert!(matches!(
        ColumnSchema::new("code", json!(["not", "a", "map"])),
        Err(Error::InvalidSchema { .. })
    ));
}

#[test]
fn test_unique_true_is_unsupported() {
    let result = ColumnSchema::new("email", json!({"constraints": {"unique": true}}));

    assert!(matches!(
        result,
        Err(Error::UnsupportedConstraint { column, constraint })
            if column == "email" && constraint == "unique"
    ));
}

#[test]
fn test_unique_false_is_accepted() {
    let column = create_column("email", json!({"constraints": {"unique": false}}));

    assert!(column.constraints().is_empty());
}

#[test]
fn test_invalid_pattern_is_invalid_constraint() {
    let result = ColumnSchema::new("code", json!({"constraints": {"pattern": "([a-z]"}}));

    assert!(matches!(
        result,
        Err(Error::InvalidConstraint { constraint, .. }) if constraint == "pattern"
    ));
}

#[test]
fn test_inverted_bounds_are_invalid() {
    assert!(matches!(
        ColumnSchema::new("c", json!({"constraints": {"minLength": 5, "maxLength": 2}})),
        Err(Error::InvalidConstraint { .. })
    ));
    assert!(matches!(
        ColumnSchema::new("c", json!({"constraints": {"minimum": 10, "maximum": 1}})),
        Err(Error::InvalidConstraint { .. })
    ));
}

#[test]
fn test_required_false_declares_nothing() {
    let column = create_column("c", json!({"constraints": {"required": false}}));

    assert!(column.validate(&TypedValue::text("")).is_empty());
}

#[test]
fn test_empty_value_fails_required_and_min_length() {
    let column = create_column("c", json!({"constraints": {"required": true, "minLength": 2}}));

    let violations = column.validate(&TypedValue::text(""));
    let names: Vec<&str> = violations.iter().map(|v| v.constraint.as_str()).collect();

    assert_eq!(names, vec!["required", "minLength"]);
    assert!(!column.is_valid(&TypedValue::text("")));
}

#[test]
fn test_long_value_fails_only_max_length() {
    let column = create_column("c", json!({"constraints": {"required": true, "maxLength": 3}}));

    let violations = column.validate(&TypedValue::text("hello"));

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].constraint, "maxLength");
    assert_eq!(violations[0].value, "hello");
}

#[test]
fn test_three_failures_reported_separately() {
    let column = create_column(
        "code",
        json!({"constraints": {"minLength": 6, "pattern": "[0-9]+", "enum": ["123456"]}}),
    );

    let violations = column.validate(&TypedValue::text("abc"));
    let names: Vec<&str> = violations.iter().map(|v| v.constraint.as_str()).collect();

    assert_eq!(names, vec!["minLength", "pattern", "enum"]);
}

#[test]
fn test_valid_value_has_no_violations() {
    let column = create_column(
        "email",
        json!({
            "type": "string",
            "format": "email",
            "constraints": {
                "required": true,
                "maxLength": 255,
                "pattern": "/^[A-Z0-9._%+-]{1,64}@(?:[A-Z0-9-]{1,63}\\.){1,125}[A-Z]{2,63}$/i"
            }
        }),
    );

    assert!(column.is_valid(&TypedValue::text("luke.visinoni@gmail.com")));
    assert_eq!(
        column.validate(&TypedValue::text("!luke.visinoni@gmail.com"))[0].constraint,
        "pattern"
    );
    assert_eq!(column.format(), Some("email"));
}

#[test]
fn test_numeric_enum_values_compare_as_text() {
    let column = create_column("level", json!({"type": "integer", "constraints": {"enum": [1, 2, 3]}}));

    assert!(column.is_valid(&TypedValue::text("2")));
    assert!(!column.is_valid(&TypedValue::text("4")));
}

#[test]
fn test_numeric_bounds() {
    let column = create_column(
        "age",
        json!({"type": "integer", "constraints": {"minimum": 0, "maximum": 150}}),
    );
    let converter = crate::value::ValueConverter::default();

    let ok = column.convert(&converter, "42").unwrap();
    let too_big = column.convert(&converter, "200").unwrap();

    assert!(column.is_valid(&ok));
    assert_eq!(column.validate(&too_big)[0].constraint, "maximum");
}

#[test]
fn test_properties_round_trip_through_serde() {
    let column = create_column(
        "c",
        json!({"type": "string", "constraints": {"required": true, "maxLength": 3}}),
    );

    let value = serde_json::to_value(column.properties()).unwrap();

    assert_eq!(
        value,
        json!({"type": "string", "constraints": {"required": true, "maxLength": 3}})
    );
}
