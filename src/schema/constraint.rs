//! Single-value constraints
//!
//! Each [`Constraint`] checks one rule against a value's text rendering and
//! fails immediately with a [`ConstraintViolation`]. Accumulating failures is
//! the column schema's job.

use crate::constants::constraint_names;
use crate::value::{NumberFormat, TypedValue};
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// One failed constraint for one value
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Column '{column}' failed constraint '{constraint}': {message}")]
pub struct ConstraintViolation {
    pub column: String,
    pub constraint: String,
    pub value: String,
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(
        column: impl Into<String>,
        constraint: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            constraint: constraint.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

/// A declared validation rule
///
/// `Pattern`, `Minimum`, `Maximum` and `Enum` pass empty values; emptiness
/// is the concern of `Required` and `MinLength`.
#[derive(Debug, Clone)]
pub enum Constraint {
    Required,
    MinLength(usize),
    MaxLength(usize),
    /// Full-match regex; `source` is the pattern as declared
    Pattern { source: String, regex: Regex },
    Minimum(f64),
    Maximum(f64),
    Enum(Vec<String>),
}

impl Constraint {
    /// Compile a declared pattern into a full-match constraint
    ///
    /// Delimited patterns such as `/^[a-z]+$/i` are accepted; trailing `i`,
    /// `m`, `s` and `x` flags become inline flags.
    pub fn pattern(source: &str) -> std::result::Result<Self, regex::Error> {
        let (body, flags) = split_delimited_pattern(source);
        let inline = if flags.is_empty() {
            String::new()
        } else {
            format!("(?{})", flags)
        };
        // \A and \z stay whole-input anchors under `m`; the newline closes
        // a trailing comment under `x`
        let regex = if flags.contains('x') {
            Regex::new(&format!("{}\\A(?:{}\n)\\z", inline, body))?
        } else {
            Regex::new(&format!("{}\\A(?:{})\\z", inline, body))?
        };
        Ok(Constraint::Pattern {
            source: source.to_string(),
            regex,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Constraint::Required => constraint_names::REQUIRED,
            Constraint::MinLength(_) => constraint_names::MIN_LENGTH,
            Constraint::MaxLength(_) => constraint_names::MAX_LENGTH,
            Constraint::Pattern { .. } => constraint_names::PATTERN,
            Constraint::Minimum(_) => constraint_names::MINIMUM,
            Constraint::Maximum(_) => constraint_names::MAXIMUM,
            Constraint::Enum(_) => constraint_names::ENUM,
        }
    }

    /// Check `value`, failing on the first broken rule
    pub fn assert(&self, column: &str, value: &TypedValue) -> Result<(), ConstraintViolation> {
        let text = value.as_text();
        let fail = |message: String| {
            Err(ConstraintViolation::new(column, self.name(), text, message))
        };

        match self {
            Constraint::Required => {
                if text.is_empty() {
                    return fail("value is required".to_string());
                }
            }
            Constraint::MinLength(min) => {
                let length = text.chars().count();
                if length < *min {
                    return fail(format!("length {} is below minimum {}", length, min));
                }
            }
            Constraint::MaxLength(max) => {
                let length = text.chars().count();
                if length > *max {
                    return fail(format!("length {} exceeds maximum {}", length, max));
                }
            }
            Constraint::Pattern { source, regex } => {
                if !text.is_empty() && !regex.is_match(text) {
                    return fail(format!("does not match pattern {}", source));
                }
            }
            Constraint::Minimum(min) => {
                if let Some(number) = numeric_reading(value) {
                    if number < *min {
                        return fail(format!("{} is below minimum {}", number, min));
                    }
                } else if !text.is_empty() {
                    return fail("not a number".to_string());
                }
            }
            Constraint::Maximum(max) => {
                if let Some(number) = numeric_reading(value) {
                    if number > *max {
                        return fail(format!("{} exceeds maximum {}", number, max));
                    }
                } else if !text.is_empty() {
                    return fail("not a number".to_string());
                }
            }
            Constraint::Enum(allowed) => {
                if !text.is_empty() && !allowed.iter().any(|a| a == text) {
                    return fail(format!("not one of [{}]", allowed.join(", ")));
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => write!(f, "{}", self.name()),
            Constraint::MinLength(n) | Constraint::MaxLength(n) => {
                write!(f, "{}={}", self.name(), n)
            }
            Constraint::Pattern { source, .. } => write!(f, "{}={}", self.name(), source),
            Constraint::Minimum(n) | Constraint::Maximum(n) => write!(f, "{}={}", self.name(), n),
            Constraint::Enum(values) => write!(f, "{}=[{}]", self.name(), values.join(", ")),
        }
    }
}

/// Numeric value of a converted number, or of text written as a number
fn numeric_reading(value: &TypedValue) -> Option<f64> {
    if let Some(number) = value.as_number() {
        return Some(number.as_f64());
    }
    NumberFormat::default()
        .parse(value.as_text())
        .ok()
        .map(|n| n.as_f64())
}

fn split_delimited_pattern(source: &str) -> (&str, String) {
    if let Some(rest) = source.strip_prefix('/') {
        if let Some(end) = rest.rfind('/') {
            let flags = &rest[end + 1..];
            if flags.chars().all(|c| matches!(c, 'i' | 'm' | 's' | 'x')) {
                return (&rest[..end], flags.to_string());
            }
        }
    }
    (source, String::new())
}
