//! Library constants
//!
//! Default dialect values, the standard boolean word pairs, schema type names
//! and the textual patterns shared by value conversion and validation.

// =============================================================================
// Flavor Defaults
// =============================================================================

/// Default cell delimiter
pub const DEFAULT_DELIMITER: char = ',';

/// Default quoting character
pub const DEFAULT_QUOTE_CHAR: char = '"';

/// Default escape character (used when double-quote escaping is off)
pub const DEFAULT_ESCAPE_CHAR: char = '\\';

/// Default line terminator (RFC 4180)
pub const DEFAULT_LINE_TERMINATOR: &str = "\r\n";

/// Line terminator used by the Unix presets
pub const UNIX_LINE_TERMINATOR: &str = "\n";

/// Recognized keys of a flavor option map
pub mod flavor_options {
    pub const DELIMITER: &str = "delimiter";
    pub const QUOTE_CHAR: &str = "quoteChar";
    pub const ESCAPE_CHAR: &str = "escapeChar";
    pub const DOUBLE_QUOTE: &str = "doubleQuote";
    pub const QUOTE_STYLE: &str = "quoteStyle";
    pub const LINE_TERMINATOR: &str = "lineTerminator";
    pub const HEADER: &str = "header";
}

// =============================================================================
// Value Conversion
// =============================================================================

/// Standard (falsy, truthy) word pairs for boolean conversion
pub const DEFAULT_BOOLEAN_PAIRS: &[(&str, &str)] = &[
    ("false", "true"),
    ("no", "yes"),
    ("off", "on"),
    ("-", "+"),
    ("0", "1"),
];

/// ISO-8601 duration pattern with an optional sign
///
/// Components must appear in order from largest to smallest.
pub const DURATION_PATTERN: &str = r"(?i)^([+-])?P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$";

/// Default currency symbols stripped before numeric conversion
pub const DEFAULT_CURRENCY_CHARS: &str = "$£¥€";

/// Default decimal separator
pub const DEFAULT_DECIMAL_CHAR: char = '.';

/// Default digit group separator
pub const DEFAULT_GROUP_CHAR: char = ',';

/// Date-time formats tried in order after RFC 3339
pub const DATETIME_FORMATS_WITH_OFFSET: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%dT%H:%M:%S%z"];

/// Naive date-time formats (interpreted as UTC)
pub const DATETIME_FORMATS_NAIVE: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Date-only format (midnight UTC)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Schema
// =============================================================================

/// Schema type names and the value kind they map to
pub mod type_names {
    pub const STRING: &str = "string";
    pub const TEXT: &str = "text";
    pub const NUMBER: &str = "number";
    pub const NUMERIC: &str = "numeric";
    pub const INTEGER: &str = "integer";
    pub const BOOLEAN: &str = "boolean";
    pub const DATETIME: &str = "datetime";
    pub const DATE_TIME: &str = "date-time";
    pub const DATE: &str = "date";
    pub const DURATION: &str = "duration";
    pub const NULL: &str = "null";
}

/// Default column type when none is declared
pub const DEFAULT_COLUMN_TYPE: &str = type_names::STRING;

/// Constraint names as they appear in property maps and violation reports
pub mod constraint_names {
    pub const REQUIRED: &str = "required";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const UNIQUE: &str = "unique";
    pub const PATTERN: &str = "pattern";
    pub const MINIMUM: &str = "minimum";
    pub const MAXIMUM: &str = "maximum";
    pub const ENUM: &str = "enum";
    /// Pseudo-constraint reported when a cell cannot be converted to the column type
    pub const TYPE: &str = "type";
}
