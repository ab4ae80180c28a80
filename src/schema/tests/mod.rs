//! Tests for column schemas, constraint accumulation and row validation

mod column_tests;
mod validation_tests;

use crate::schema::ColumnSchema;

/// Build a column from a JSON property map, panicking on schema errors
pub fn create_column(id: &str, properties: serde_json::Value) -> ColumnSchema {
    ColumnSchema::new(id, properties)
        .unwrap_or_else(|e| panic!("column '{}' should build: {}", id, e))
}
