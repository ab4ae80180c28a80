//! Tests for typed value conversion

mod boolean_tests;
mod duration_tests;

use crate::value::{TypedValue, ValueConverter, ValueKind};

/// Convert with a fresh default converter, panicking on failure
pub fn convert(kind: ValueKind, raw: &str) -> TypedValue {
    ValueConverter::default()
        .convert(kind, raw)
        .unwrap_or_else(|e| panic!("conversion of '{}' to {} failed: {}", raw, kind, e))
}
