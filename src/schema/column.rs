//! Per-column schema declarations

use super::constraint::{Constraint, ConstraintViolation};
use crate::constants::{DEFAULT_COLUMN_TYPE, constraint_names};
use crate::value::{TypedValue, ValueConverter, ValueKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const KNOWN_PROPERTIES: &[&str] = &["name", "title", "type", "format", "description", "constraints"];

const KNOWN_CONSTRAINTS: &[&str] = &[
    constraint_names::REQUIRED,
    constraint_names::MIN_LENGTH,
    constraint_names::MAX_LENGTH,
    constraint_names::UNIQUE,
    constraint_names::PATTERN,
    constraint_names::MINIMUM,
    constraint_names::MAXIMUM,
    constraint_names::ENUM,
];

fn default_type() -> String {
    DEFAULT_COLUMN_TYPE.to_string()
}

/// Constraint declarations as they appear in a property map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

/// Descriptive column properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default = "default_type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub constraints: ConstraintSet,
}

impl Default for ColumnProperties {
    fn default() -> Self {
        Self {
            name: None,
            title: None,
            type_name: default_type(),
            format: None,
            description: None,
            constraints: ConstraintSet::default(),
        }
    }
}

/// Expected type and constraints for one logical column
///
/// Unknown property and constraint keys are ignored. A `unique: true`
/// declaration is rejected: it needs the whole column, which a per-value
/// validator never sees.
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    id: String,
    properties: ColumnProperties,
    constraints: Vec<Constraint>,
}

impl ColumnSchema {
    /// Build a column from a JSON property map (`null` means no properties)
    pub fn new(id: impl Into<String>, properties: serde_json::Value) -> Result<Self> {
        let id = id.into();
        if properties.is_null() {
            return Self::from_properties(id, ColumnProperties::default());
        }
        log_unknown_keys(&id, &properties);

        let properties: ColumnProperties =
            serde_json::from_value(properties).map_err(|e| Error::invalid_schema(&id, e))?;

        Self::from_properties(id, properties)
    }

    /// Build a column from already-typed properties
    pub fn from_properties(id: impl Into<String>, properties: ColumnProperties) -> Result<Self> {
        let id = id.into();
        let constraints = compile_constraints(&id, &properties.constraints)?;

        debug!(
            "Column '{}' ({}) with {} constraint(s)",
            id,
            properties.type_name,
            constraints.len()
        );

        Ok(Self {
            id,
            properties,
            constraints,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Declared name, or the id when none was given
    pub fn name(&self) -> &str {
        self.properties.name.as_deref().unwrap_or(&self.id)
    }

    pub fn title(&self) -> Option<&str> {
        self.properties.title.as_deref()
    }

    pub fn type_name(&self) -> &str {
        &self.properties.type_name
    }

    pub fn format(&self) -> Option<&str> {
        self.properties.format.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.properties.description.as_deref()
    }

    pub fn kind(&self) -> ValueKind {
        ValueKind::from_type_name(&self.properties.type_name)
    }

    pub fn properties(&self) -> &ColumnProperties {
        &self.properties
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constraint declared under `name`, if any
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name() == name)
    }

    /// Convert raw cell text into this column's kind
    pub fn convert(&self, converter: &ValueConverter, raw: &str) -> Result<TypedValue> {
        converter.convert(self.kind(), raw)
    }

    /// Check every declared constraint, collecting all failures
    pub fn validate(&self, value: &TypedValue) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for constraint in &self.constraints {
            if let Err(violation) = constraint.assert(&self.id, value) {
                debug!("{}", violation);
                violations.push(violation);
            }
        }

        violations
    }

    pub fn is_valid(&self, value: &TypedValue) -> bool {
        self.constraints
            .iter()
            .all(|c| c.assert(&self.id, value).is_ok())
    }
}

fn compile_constraints(column: &str, set: &ConstraintSet) -> Result<Vec<Constraint>> {
    if set.unique == Some(true) {
        return Err(Error::unsupported_constraint(column, constraint_names::UNIQUE));
    }

    if let (Some(min), Some(max)) = (set.min_length, set.max_length) {
        if min > max {
            return Err(Error::invalid_constraint(
                column,
                constraint_names::MIN_LENGTH,
                format!("minLength {} is greater than maxLength {}", min, max),
            ));
        }
    }

    if let (Some(min), Some(max)) = (set.minimum, set.maximum) {
        if min > max {
            return Err(Error::invalid_constraint(
                column,
                constraint_names::MINIMUM,
                format!("minimum {} is greater than maximum {}", min, max),
            ));
        }
    }

    let mut constraints = Vec::new();

    if set.required == Some(true) {
        constraints.push(Constraint::Required);
    }
    if let Some(min) = set.min_length {
        constraints.push(Constraint::MinLength(min));
    }
    if let Some(max) = set.max_length {
        constraints.push(Constraint::MaxLength(max));
    }
    if let Some(pattern) = &set.pattern {
        let constraint = Constraint::pattern(pattern).map_err(|e| {
            Error::invalid_constraint(column, constraint_names::PATTERN, e.to_string())
        })?;
        constraints.push(constraint);
    }
    if let Some(min) = set.minimum {
        constraints.push(Constraint::Minimum(min));
    }
    if let Some(max) = set.maximum {
        constraints.push(Constraint::Maximum(max));
    }
    if let Some(values) = &set.enum_values {
        let allowed = values
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        constraints.push(Constraint::Enum(allowed));
    }

    Ok(constraints)
}

fn log_unknown_keys(column: &str, properties: &serde_json::Value) {
    let Some(map) = properties.as_object() else {
        return;
    };

    for key in map.keys().filter(|k| !KNOWN_PROPERTIES.contains(&k.as_str())) {
        warn!("Ignoring unknown property '{}' on column '{}'", key, column);
    }

    if let Some(constraints) = map.get("constraints").and_then(|c| c.as_object()) {
        for key in constraints
            .keys()
            .filter(|k| !KNOWN_CONSTRAINTS.contains(&k.as_str()))
        {
            warn!("Ignoring unknown constraint '{}' on column '{}'", key, column);
        }
    }
}
