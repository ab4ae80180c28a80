//! Flavored CSV Library
//!
//! A Rust library for working with single rows of delimited tabular text as
//! typed, dual-indexed, immutable records.
//!
//! This library provides tools for:
//! - Describing CSV dialects ("flavors") with named presets (Excel, Unix, tab variants)
//! - Immutable rows addressable by position and, once a header row is attached, by name
//! - Converting raw cell text into canonical typed values (booleans, numbers, durations, ...)
//! - Declaring per-column schemas and accumulating every constraint violation for a value
//! - Filtering row sequences with ordered, short-circuiting predicates
//! - Reading and writing rows through the `csv` crate using a flavor's rules

pub mod config;
pub mod constants;
pub mod flavor;
pub mod io;
pub mod row;
pub mod schema;
pub mod value;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::Config;
pub use flavor::{FlavorConfig, Preset, QuoteStyle};
pub use row::{CellKey, FilteredRows, HeaderRow, Row, RowIteratorExt, RowKey};
pub use schema::{ColumnSchema, ConstraintViolation, Schema, ValidationReport};
pub use value::{TypedValue, ValueConverter, ValueKind};

/// Result type alias for flavored CSV operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for row access, value conversion and schema validation
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Attempted write or removal on write-once row data
    #[error("Cannot change immutable row data at position {position}")]
    ImmutableMutation { position: usize },

    /// Positional access outside the row
    #[error("Index {position} out of range for row of length {length}")]
    IndexOutOfRange { position: usize, length: usize },

    /// Neither the header mapping nor positional access resolved the key
    #[error("Undefined index: {key}")]
    UndefinedIndex { key: String },

    /// Raw input could not be converted into the requested kind
    #[error("Invalid value for type {kind}: '{value}' ({reason})")]
    InvalidValueForType {
        kind: value::ValueKind,
        value: String,
        reason: String,
    },

    /// A single constraint failed
    #[error(transparent)]
    ConstraintViolation(#[from] ConstraintViolation),

    /// Explicit marker for behavior that does not exist yet
    #[error("Not yet implemented: {feature}")]
    NotYetImplemented { feature: String },

    /// Constraint declared on a column that cannot be honored per value
    #[error("Unsupported constraint '{constraint}' on column '{column}'")]
    UnsupportedConstraint { column: String, constraint: String },

    /// Constraint parameter is malformed (e.g. an invalid regex)
    #[error("Invalid constraint '{constraint}' on column '{column}': {message}")]
    InvalidConstraint {
        column: String,
        constraint: String,
        message: String,
    },

    /// Column property map has the wrong shape
    #[error("Invalid schema for column '{column}': {source}")]
    InvalidSchema {
        column: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// CSV tokenizer or writer error
    #[error("CSV error: {message}")]
    Csv {
        message: String,
        #[source]
        source: csv::Error,
    },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an immutable mutation error
    pub fn immutable_mutation(position: usize) -> Self {
        Self::ImmutableMutation { position }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(position: usize, length: usize) -> Self {
        Self::IndexOutOfRange { position, length }
    }

    /// Create an undefined index error
    pub fn undefined_index(key: impl Into<String>) -> Self {
        Self::UndefinedIndex { key: key.into() }
    }

    /// Create an invalid value error for a value kind
    pub fn invalid_value(
        kind: value::ValueKind,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValueForType {
            kind,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a not yet implemented error
    pub fn not_yet_implemented(feature: impl Into<String>) -> Self {
        Self::NotYetImplemented {
            feature: feature.into(),
        }
    }

    /// Create an unsupported constraint error
    pub fn unsupported_constraint(column: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::UnsupportedConstraint {
            column: column.into(),
            constraint: constraint.into(),
        }
    }

    /// Create an invalid constraint error
    pub fn invalid_constraint(
        column: impl Into<String>,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidConstraint {
            column: column.into(),
            constraint: constraint.into(),
            message: message.into(),
        }
    }

    /// Create an invalid schema error
    pub fn invalid_schema(column: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidSchema {
            column: column.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a CSV error with context
    pub fn csv(message: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            message: message.into(),
            source,
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Csv {
            message: "CSV processing failed".to_string(),
            source: error,
        }
    }
}
