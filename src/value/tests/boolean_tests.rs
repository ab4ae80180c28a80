//! Tests for boolean conversion and the word pair registry

use super::*;
use crate::value::BooleanRegistry;

#[test]
fn test_standard_falsy_and_truthy_words() {
    assert_eq!(convert(ValueKind::Boolean, "false").as_bool(), Some(false));
    assert_eq!(convert(ValueKind::Boolean, "YES").as_bool(), Some(true));
    assert_eq!(convert(ValueKind::Boolean, "").as_bool(), Some(false));
    assert_eq!(convert(ValueKind::Boolean, "anything-else").as_bool(), Some(true));
}

#[test]
fn test_every_default_pair() {
    for (falsy, truthy) in crate::constants::DEFAULT_BOOLEAN_PAIRS {
        assert_eq!(convert(ValueKind::Boolean, falsy).as_bool(), Some(false), "{}", falsy);
        assert_eq!(convert(ValueKind::Boolean, truthy).as_bool(), Some(true), "{}", truthy);
    }
}

#[test]
fn test_matching_is_case_insensitive_and_trimmed() {
    let registry = BooleanRegistry::default();

    assert!(!registry.convert("OFF"));
    assert!(!registry.convert("  No "));
    assert!(registry.convert("On"));
    // Whole-token matching: "nothing" contains "no" but is not falsy
    assert!(registry.convert("nothing"));
}

#[test]
fn test_whitespace_only_is_true() {
    assert_eq!(convert(ValueKind::Boolean, "   ").as_bool(), Some(true));
    assert_eq!(convert(ValueKind::Boolean, " \t").as_bool(), Some(true));
    assert_eq!(convert(ValueKind::Boolean, "").as_bool(), Some(false));
}

#[test]
fn test_register_pair_returns_count() {
    let mut converter = ValueConverter::default();
    assert_eq!(converter.booleans().len(), 5);

    assert_eq!(converter.register_boolean_pair("nope", "yep"), 6);
    assert_eq!(converter.booleans().len(), 6);

    let value = converter.convert(ValueKind::Boolean, "nope").unwrap();
    assert_eq!(value.as_bool(), Some(false));
    assert_eq!(value.as_text(), "nope");
}

#[test]
fn test_registered_pairs_do_not_leak_between_converters() {
    let mut custom = ValueConverter::default();
    custom.register_boolean_pair("nope", "yep");

    let standard = ValueConverter::default();
    assert_eq!(
        standard.convert(ValueKind::Boolean, "nope").unwrap().as_bool(),
        Some(true)
    );
    assert_eq!(standard.booleans().len(), 5);
}

#[test]
fn test_empty_registry_treats_all_non_empty_as_true() {
    let registry = BooleanRegistry::empty();

    assert!(registry.is_empty());
    assert!(registry.convert("false"));
    assert!(!registry.convert(""));
}

#[test]
fn test_boolean_token_check() {
    let converter = ValueConverter::default();

    assert!(converter.is_valid_token(ValueKind::Boolean, "yes"));
    assert!(converter.is_valid_token(ValueKind::Boolean, "+"));
    assert!(!converter.is_valid_token(ValueKind::Boolean, "maybe"));
    assert!(TypedValue::is_valid_token(ValueKind::Boolean, "TRUE"));
}
