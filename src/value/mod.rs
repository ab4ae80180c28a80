//! Typed cell values
//!
//! A [`TypedValue`] is a cell converted into one of a closed set of kinds.
//! Conversion happens once, through a [`ValueConverter`] that owns the
//! context conversions depend on (boolean word registry, number format).
//! Every value keeps the text it was built from, which is what constraints
//! are checked against.
//!
//! Empty text converts to [`TypedValue::Null`] for the numeric, date/time and
//! duration kinds. Boolean conversion of empty text is `false`.

pub mod boolean;
pub mod datetime;
pub mod duration;
pub mod numeric;

#[cfg(test)]
mod tests;

pub use boolean::BooleanRegistry;
pub use duration::{DurationParseError, IsoDuration};
pub use numeric::{Number, NumberFormat};

use crate::constants::type_names;
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The kinds a cell can be converted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    Boolean,
    Numeric,
    Text,
    Null,
    DateTime,
    Duration,
}

impl ValueKind {
    /// Map a schema type name onto a kind; unknown names are text
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name.trim().to_ascii_lowercase().as_str() {
            type_names::BOOLEAN => ValueKind::Boolean,
            type_names::NUMBER | type_names::NUMERIC | type_names::INTEGER => ValueKind::Numeric,
            type_names::DATETIME | type_names::DATE_TIME | type_names::DATE => ValueKind::DateTime,
            type_names::DURATION => ValueKind::Duration,
            type_names::NULL => ValueKind::Null,
            type_names::STRING | type_names::TEXT => ValueKind::Text,
            other => {
                debug!("Unknown type name '{}', treating as text", other);
                ValueKind::Text
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Numeric => "numeric",
            ValueKind::Text => "text",
            ValueKind::Null => "null",
            ValueKind::DateTime => "date-time",
            ValueKind::Duration => "duration",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A converted cell: its kind, canonical value and source text
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Boolean { value: bool, text: String },
    Numeric { value: Number, text: String },
    Text(String),
    Null,
    DateTime {
        value: DateTime<FixedOffset>,
        text: String,
    },
    Duration { value: IsoDuration, text: String },
}

impl TypedValue {
    pub fn from_bool(value: bool) -> Self {
        TypedValue::Boolean {
            value,
            text: value.to_string(),
        }
    }

    pub fn from_number(value: Number) -> Self {
        TypedValue::Numeric {
            value,
            text: value.to_string(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        TypedValue::Text(value.into())
    }

    pub fn from_datetime(value: DateTime<FixedOffset>) -> Self {
        TypedValue::DateTime {
            text: value.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            value,
        }
    }

    /// Date/time from unix seconds (UTC)
    pub fn from_timestamp(seconds: i64) -> Result<Self> {
        datetime::from_timestamp(seconds)
            .map(Self::from_datetime)
            .map_err(|reason| Error::invalid_value(ValueKind::DateTime, seconds.to_string(), reason))
    }

    pub fn from_duration(value: IsoDuration) -> Self {
        TypedValue::Duration {
            text: value.to_string(),
            value,
        }
    }

    /// Duration from an elapsed time span (days and below only)
    pub fn from_time_delta(delta: TimeDelta) -> Self {
        Self::from_duration(IsoDuration::from_time_delta(delta))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            TypedValue::Boolean { .. } => ValueKind::Boolean,
            TypedValue::Numeric { .. } => ValueKind::Numeric,
            TypedValue::Text(_) => ValueKind::Text,
            TypedValue::Null => ValueKind::Null,
            TypedValue::DateTime { .. } => ValueKind::DateTime,
            TypedValue::Duration { .. } => ValueKind::Duration,
        }
    }

    /// Text the value was built from (empty for null)
    pub fn as_text(&self) -> &str {
        match self {
            TypedValue::Boolean { text, .. }
            | TypedValue::Numeric { text, .. }
            | TypedValue::DateTime { text, .. }
            | TypedValue::Duration { text, .. }
            | TypedValue::Text(text) => text,
            TypedValue::Null => "",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            TypedValue::Numeric { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            TypedValue::DateTime { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<&IsoDuration> {
        match self {
            TypedValue::Duration { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// Token check against the standard word pairs and number format
    pub fn is_valid_token(kind: ValueKind, raw: &str) -> bool {
        ValueConverter::default().is_valid_token(kind, raw)
    }

    /// Canonical value as JSON: booleans and numbers natively, date/times as
    /// RFC 3339, durations in canonical ISO-8601 form
    pub fn canonical_value(&self) -> serde_json::Value {
        match self {
            TypedValue::Boolean { value, .. } => serde_json::Value::Bool(*value),
            TypedValue::Numeric { value, .. } => match value {
                Number::Integer(i) => serde_json::Value::from(*i),
                Number::Float(f) => serde_json::Value::from(*f),
            },
            TypedValue::Text(text) => serde_json::Value::String(text.clone()),
            TypedValue::Null => serde_json::Value::Null,
            TypedValue::DateTime { value, .. } => {
                serde_json::Value::String(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            TypedValue::Duration { value, .. } => serde_json::Value::String(value.to_string()),
        }
    }

    /// Convert this value into another kind
    ///
    /// Identity and casts to text always succeed; booleans and numbers
    /// convert into each other. Every other pairing is not implemented yet.
    pub fn cast_to(&self, target: ValueKind) -> Result<TypedValue> {
        match (self, target) {
            (value, target) if value.kind() == target => Ok(value.clone()),
            (value, ValueKind::Text) => Ok(TypedValue::Text(value.as_text().to_string())),
            (TypedValue::Boolean { value, .. }, ValueKind::Numeric) => {
                Ok(TypedValue::from_number(Number::Integer(i64::from(*value))))
            }
            (TypedValue::Numeric { value, .. }, ValueKind::Boolean) => {
                Ok(TypedValue::from_bool(!value.is_zero()))
            }
            (value, target) => Err(Error::not_yet_implemented(format!(
                "cast from {} to {}",
                value.kind(),
                target
            ))),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

type Conversion = fn(&ValueConverter, &str) -> Result<TypedValue>;

/// Converts raw cell text into typed values
///
/// Owns the boolean word registry and number format so that custom words
/// registered on one converter never leak into another.
#[derive(Debug, Clone, Default)]
pub struct ValueConverter {
    booleans: BooleanRegistry,
    numbers: NumberFormat,
}

impl ValueConverter {
    pub fn new(booleans: BooleanRegistry, numbers: NumberFormat) -> Self {
        Self { booleans, numbers }
    }

    pub fn booleans(&self) -> &BooleanRegistry {
        &self.booleans
    }

    pub fn number_format(&self) -> &NumberFormat {
        &self.numbers
    }

    /// Register an extra (falsy, truthy) word pair, returning the pair count
    pub fn register_boolean_pair(
        &mut self,
        falsy: impl Into<String>,
        truthy: impl Into<String>,
    ) -> usize {
        self.booleans.register(falsy, truthy)
    }

    /// Convert `raw` into `kind`
    pub fn convert(&self, kind: ValueKind, raw: &str) -> Result<TypedValue> {
        conversion_for(kind)(self, raw)
    }

    /// Convert `raw` using a schema type name
    pub fn convert_as(&self, type_name: &str, raw: &str) -> Result<TypedValue> {
        self.convert(ValueKind::from_type_name(type_name), raw)
    }

    /// Whether `raw` is written in the canonical syntax of `kind`
    pub fn is_valid_token(&self, kind: ValueKind, raw: &str) -> bool {
        match kind {
            ValueKind::Boolean => self.booleans.is_boolean_token(raw),
            ValueKind::Numeric => self.numbers.is_numeric(raw),
            ValueKind::Duration => IsoDuration::matches_pattern(raw),
            ValueKind::DateTime => datetime::parse_datetime(raw).is_ok(),
            ValueKind::Null => raw.trim().is_empty(),
            ValueKind::Text => true,
        }
    }

    pub fn boolean(&self, raw: &str) -> TypedValue {
        TypedValue::Boolean {
            value: self.booleans.convert(raw),
            text: raw.to_string(),
        }
    }

    pub fn numeric(&self, raw: &str) -> Result<TypedValue> {
        if raw.trim().is_empty() {
            return Ok(TypedValue::Null);
        }
        let value = self
            .numbers
            .parse(raw)
            .map_err(|reason| Error::invalid_value(ValueKind::Numeric, raw, reason))?;
        Ok(TypedValue::Numeric {
            value,
            text: raw.to_string(),
        })
    }

    pub fn datetime(&self, raw: &str) -> Result<TypedValue> {
        if raw.trim().is_empty() {
            return Ok(TypedValue::Null);
        }
        let value = datetime::parse_datetime(raw)
            .map_err(|reason| Error::invalid_value(ValueKind::DateTime, raw, reason))?;
        Ok(TypedValue::DateTime {
            value,
            text: raw.to_string(),
        })
    }

    /// Parse `[+-]` ISO-8601 duration text; a leading `-` inverts the sign
    pub fn duration(&self, raw: &str) -> Result<TypedValue> {
        if raw.trim().is_empty() {
            return Ok(TypedValue::Null);
        }
        let value = IsoDuration::parse(raw)
            .map_err(|e| Error::invalid_value(ValueKind::Duration, raw, e.to_string()))?;
        Ok(TypedValue::Duration {
            value,
            text: raw.to_string(),
        })
    }
}

fn conversion_for(kind: ValueKind) -> Conversion {
    match kind {
        ValueKind::Boolean => |converter: &ValueConverter, raw: &str| Ok(converter.boolean(raw)),
        ValueKind::Numeric => ValueConverter::numeric,
        ValueKind::Text => |_: &ValueConverter, raw: &str| Ok(TypedValue::text(raw)),
        ValueKind::Null => |_: &ValueConverter, _: &str| Ok(TypedValue::Null),
        ValueKind::DateTime => ValueConverter::datetime,
        ValueKind::Duration => ValueConverter::duration,
    }
}
