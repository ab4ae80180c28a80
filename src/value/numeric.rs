//! Numeric text parsing with configurable separators and currency symbols

use crate::constants::{DEFAULT_CURRENCY_CHARS, DEFAULT_DECIMAL_CHAR, DEFAULT_GROUP_CHAR};
use crate::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Canonical numeric value: integers stay integers unless they overflow
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Integer(i) => *i == 0,
            Number::Float(f) => *f == 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

/// How numbers are written in a source: decimal separator, digit grouping
/// and currency symbols to ignore
#[derive(Debug, Clone)]
pub struct NumberFormat {
    decimal_char: char,
    group_char: char,
    currency_chars: String,
    pattern: Regex,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::build(DEFAULT_DECIMAL_CHAR, DEFAULT_GROUP_CHAR, DEFAULT_CURRENCY_CHARS)
            .expect("default number format is valid")
    }
}

impl NumberFormat {
    /// Create a format with custom separators and the default currency symbols
    pub fn new(decimal_char: char, group_char: char) -> Result<Self> {
        Self::build(decimal_char, group_char, DEFAULT_CURRENCY_CHARS)
    }

    /// Replace the set of currency symbols
    pub fn with_currency_chars(&self, currency_chars: &str) -> Result<Self> {
        Self::build(self.decimal_char, self.group_char, currency_chars)
    }

    fn build(decimal_char: char, group_char: char, currency_chars: &str) -> Result<Self> {
        if decimal_char == group_char {
            return Err(Error::configuration(format!(
                "Decimal and group separators must differ (both '{}')",
                decimal_char
            )));
        }
        if decimal_char.is_ascii_digit() || group_char.is_ascii_digit() {
            return Err(Error::configuration(
                "Decimal and group separators cannot be digits",
            ));
        }

        let escaped_currency: String = currency_chars
            .chars()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let currency = if escaped_currency.is_empty() {
            String::new()
        } else {
            format!("[{}]?", escaped_currency)
        };
        let group = regex::escape(&group_char.to_string());
        let decimal = regex::escape(&decimal_char.to_string());

        let pattern = format!(
            r"^[+-]?{currency}[0-9][0-9{group}]*(?:{decimal}[0-9]+)?(?:[eE][+-]?[0-9]+)?$"
        );
        let pattern = Regex::new(&pattern).map_err(|e| {
            Error::configuration(format!("Invalid number format pattern: {}", e))
        })?;

        Ok(Self {
            decimal_char,
            group_char,
            currency_chars: currency_chars.to_string(),
            pattern,
        })
    }

    pub fn decimal_char(&self) -> char {
        self.decimal_char
    }

    pub fn group_char(&self) -> char {
        self.group_char
    }

    pub fn currency_chars(&self) -> &str {
        &self.currency_chars
    }

    /// Whether `raw` is written as a number in this format
    pub fn is_numeric(&self, raw: &str) -> bool {
        self.pattern.is_match(raw.trim())
    }

    /// Parse `raw` into a canonical number
    ///
    /// Currency symbols and group separators are stripped; the decimal
    /// separator is normalized to `.`.
    pub fn parse(&self, raw: &str) -> std::result::Result<Number, String> {
        let trimmed = raw.trim();
        if !self.pattern.is_match(trimmed) {
            return Err(format!(
                "not a number (decimal '{}', group '{}')",
                self.decimal_char, self.group_char
            ));
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| *c != self.group_char && !self.currency_chars.contains(*c))
            .map(|c| if c == self.decimal_char { '.' } else { c })
            .collect();

        let is_float = normalized.contains(['.', 'e', 'E']);
        if !is_float {
            if let Ok(i) = normalized.parse::<i64>() {
                return Ok(Number::Integer(i));
            }
        }

        let value = normalized
            .parse::<f64>()
            .map_err(|e| format!("not a number: {}", e))?;
        if !value.is_finite() {
            return Err(format!("{} is out of range", trimmed));
        }
        Ok(Number::Float(value))
    }
}
