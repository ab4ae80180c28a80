//! Tests for rows, header rows and row filtering


// Test helper functions and fixtures
use crate::flavor::FlavorConfig;
use crate::row::{HeaderRow, Row};
use std::sync::Arc;

/// Create a row from string literals with the default flavor
pub fn create_row(cells: &[&str]) -> Row {
    Row::new(cells.iter().copied())
}

/// Create a row with an explicit flavor
pub fn create_row_with_flavor(cells: &[&str], flavor: FlavorConfig) -> Row {
    Row::with_flavor(cells.iter().copied(), Arc::new(flavor))
}

/// Create a shared header row
pub fn create_header(names: &[&str]) -> Arc<HeaderRow> {
    Arc::new(HeaderRow::new(names.iter().copied()))
}
