//! Column schemas and row validation
//!
//! A [`Schema`] is an ordered set of [`ColumnSchema`] declarations keyed by
//! column id. Validating a row converts each declared cell into its column's
//! kind and checks every constraint, accumulating all failures into a
//! [`ValidationReport`] instead of stopping at the first.

pub mod column;
pub mod constraint;

#[cfg(test)]
mod tests;

pub use column::{ColumnProperties, ColumnSchema, ConstraintSet};
pub use constraint::{Constraint, ConstraintViolation};

use crate::constants::constraint_names;
use crate::row::Row;
use crate::value::{TypedValue, ValueConverter};
use crate::{Error, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Ordered column declarations
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
}

impl Schema {
    /// Build from columns; a repeated id replaces the earlier declaration
    pub fn new(columns: impl IntoIterator<Item = ColumnSchema>) -> Self {
        let mut schema = Self::default();
        for column in columns {
            schema.insert(column);
        }
        schema
    }

    /// Build from a JSON object mapping column id to property map
    ///
    /// Columns come out in key order; use [`Schema::new`] to keep a
    /// declaration order.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| Error::configuration("Schema must be a JSON object of columns"))?;

        let columns = map
            .iter()
            .map(|(id, properties)| ColumnSchema::new(id.as_str(), properties.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(columns))
    }

    pub fn insert(&mut self, column: ColumnSchema) {
        match self.columns.iter_mut().find(|c| c.id() == column.id()) {
            Some(existing) => {
                warn!("Column '{}' declared twice, keeping the later one", column.id());
                *existing = column;
            }
            None => self.columns.push(column),
        }
    }

    pub fn column(&self, id: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.id() == id)
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Validate every declared column of `row`
    ///
    /// A column missing from the row is validated as an empty cell. A cell
    /// that cannot be converted into its column's kind is reported under the
    /// `type` pseudo-constraint and its other constraints are not checked.
    pub fn validate_row(&self, row: &Row, converter: &ValueConverter) -> ValidationReport {
        let mut report = ValidationReport::default();

        for column in &self.columns {
            let raw = row.get(column.id()).unwrap_or_else(|_| {
                debug!("Column '{}' missing from row, validating as empty", column.id());
                ""
            });

            match column.convert(converter, raw) {
                Ok(value) => report.extend(column.validate(&value)),
                Err(e) => report.push(ConstraintViolation::new(
                    column.id(),
                    constraint_names::TYPE,
                    raw,
                    e.to_string(),
                )),
            }
        }

        report
    }

    /// Convert every declared column of `row` into typed values
    pub fn convert_row(
        &self,
        row: &Row,
        converter: &ValueConverter,
    ) -> Result<Vec<(String, TypedValue)>> {
        self.columns
            .iter()
            .map(|column| -> Result<(String, TypedValue)> {
                let raw = row.get(column.id())?;
                Ok((column.id().to_string(), column.convert(converter, raw)?))
            })
            .collect()
    }
}

/// Every constraint violation found in one or more rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    violations: Vec<ConstraintViolation>,
}

impl ValidationReport {
    pub fn push(&mut self, violation: ConstraintViolation) {
        self.violations.push(violation);
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = ConstraintViolation>) {
        self.violations.extend(violations);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.violations.extend(other.violations);
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[ConstraintViolation] {
        &self.violations
    }

    /// Violations reported for one column
    pub fn for_column<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = &'a ConstraintViolation> + 'a {
        self.violations.iter().filter(move |v| v.column == column)
    }

    /// Names of the failed constraints, in report order
    pub fn constraint_names(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.constraint.as_str()).collect()
    }

    /// The first violation as an error, if any
    pub fn into_result(self) -> Result<()> {
        match self.violations.into_iter().next() {
            Some(violation) => Err(violation.into()),
            None => Ok(()),
        }
    }
}

impl IntoIterator for ValidationReport {
    type Item = ConstraintViolation;
    type IntoIter = std::vec::IntoIter<ConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}
