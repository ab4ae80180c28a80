//! CSV dialect ("flavor") descriptors and named presets.
//!
//! A [`FlavorConfig`] is a pure value: it is built once, never mutated, and
//! shared (usually behind an `Arc`) by every row read with it. Deriving a
//! variant always produces a new instance with only the named fields changed.

use crate::constants::{
    DEFAULT_DELIMITER, DEFAULT_ESCAPE_CHAR, DEFAULT_LINE_TERMINATOR, DEFAULT_QUOTE_CHAR,
    UNIX_LINE_TERMINATOR, flavor_options,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Which cells get enclosed in quote characters when writing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStyle {
    /// Only cells containing the delimiter, quote char or a line break
    #[default]
    Minimal,
    /// Every cell
    All,
    /// Every cell that does not look like a number
    NonNumeric,
    /// Never quote
    None,
}

impl FromStr for QuoteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = normalized.strip_prefix("quote_").unwrap_or(&normalized);
        match normalized.replace(['-', '_'], "").as_str() {
            "minimal" => Ok(QuoteStyle::Minimal),
            "all" => Ok(QuoteStyle::All),
            "nonnumeric" => Ok(QuoteStyle::NonNumeric),
            "none" => Ok(QuoteStyle::None),
            _ => Err(format!("Unknown quote style: {}", s)),
        }
    }
}

impl fmt::Display for QuoteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuoteStyle::Minimal => "quote_minimal",
            QuoteStyle::All => "quote_all",
            QuoteStyle::NonNumeric => "quote_nonnumeric",
            QuoteStyle::None => "quote_none",
        };
        f.write_str(name)
    }
}

/// Immutable description of a CSV dialect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorConfig {
    delimiter: char,
    quote_char: char,
    escape_char: Option<char>,
    double_quote: bool,
    line_terminator: Cow<'static, str>,
    quote_style: QuoteStyle,
    header: bool,
}

impl Default for FlavorConfig {
    fn default() -> Self {
        Self::EXCEL
    }
}

impl FlavorConfig {
    /// RFC 4180 flavor as produced by Excel
    pub const EXCEL: FlavorConfig = FlavorConfig {
        delimiter: DEFAULT_DELIMITER,
        quote_char: DEFAULT_QUOTE_CHAR,
        escape_char: Some(DEFAULT_ESCAPE_CHAR),
        double_quote: true,
        line_terminator: Cow::Borrowed(DEFAULT_LINE_TERMINATOR),
        quote_style: QuoteStyle::Minimal,
        header: true,
    };

    /// Excel flavor with tab delimiters
    pub const EXCEL_TAB: FlavorConfig = FlavorConfig {
        delimiter: '\t',
        ..FlavorConfig::EXCEL
    };

    /// Flavor produced by typical unix tools: backslash escapes, LF endings
    pub const UNIX: FlavorConfig = FlavorConfig {
        double_quote: false,
        line_terminator: Cow::Borrowed(UNIX_LINE_TERMINATOR),
        quote_style: QuoteStyle::NonNumeric,
        ..FlavorConfig::EXCEL
    };

    /// Unix flavor with tab delimiters
    pub const UNIX_TAB: FlavorConfig = FlavorConfig {
        delimiter: '\t',
        ..FlavorConfig::UNIX
    };

    /// Build a flavor from an option map, starting from the defaults
    ///
    /// Recognized keys are `delimiter`, `quoteChar`, `escapeChar`,
    /// `doubleQuote`, `quoteStyle`, `lineTerminator` and `header`. Unknown
    /// keys are ignored and invalid values keep the default.
    pub fn from_options(options: &Map<String, Value>) -> Self {
        Self::default().copy_with(options)
    }

    /// Copy this flavor, overriding only the fields named in `options`
    pub fn copy_with(&self, options: &Map<String, Value>) -> Self {
        let mut flavor = self.clone();

        for (key, value) in options {
            match key.as_str() {
                flavor_options::DELIMITER => {
                    if let Some(c) = single_char(value) {
                        flavor.delimiter = c;
                    } else {
                        warn!("Ignoring invalid flavor delimiter: {}", value);
                    }
                }
                flavor_options::QUOTE_CHAR => {
                    if let Some(c) = single_char(value) {
                        flavor.quote_char = c;
                    } else {
                        warn!("Ignoring invalid flavor quoteChar: {}", value);
                    }
                }
                flavor_options::ESCAPE_CHAR => match value {
                    Value::Null => flavor.escape_char = None,
                    Value::String(s) if s.is_empty() => flavor.escape_char = None,
                    other => match single_char(other) {
                        Some(c) => flavor.escape_char = Some(c),
                        None => warn!("Ignoring invalid flavor escapeChar: {}", other),
                    },
                },
                flavor_options::DOUBLE_QUOTE => match value.as_bool() {
                    Some(b) => flavor.double_quote = b,
                    None => warn!("Ignoring invalid flavor doubleQuote: {}", value),
                },
                flavor_options::HEADER => match value.as_bool() {
                    Some(b) => flavor.header = b,
                    None => warn!("Ignoring invalid flavor header: {}", value),
                },
                flavor_options::QUOTE_STYLE => {
                    match value.as_str().map(QuoteStyle::from_str) {
                        Some(Ok(style)) => flavor.quote_style = style,
                        _ => warn!("Ignoring invalid flavor quoteStyle: {}", value),
                    }
                }
                flavor_options::LINE_TERMINATOR => match value.as_str() {
                    Some(s) if !s.is_empty() => flavor.line_terminator = Cow::Owned(s.to_string()),
                    _ => warn!("Ignoring invalid flavor lineTerminator: {}", value),
                },
                unknown => debug!("Ignoring unknown flavor option: {}", unknown),
            }
        }

        flavor
    }

    /// Copy this flavor with a different delimiter
    pub fn with_delimiter(&self, delimiter: char) -> Self {
        Self {
            delimiter,
            ..self.clone()
        }
    }

    /// Copy this flavor with header presence changed
    pub fn with_header(&self, header: bool) -> Self {
        Self {
            header,
            ..self.clone()
        }
    }

    /// Copy this flavor with a different quoting style
    pub fn with_quote_style(&self, quote_style: QuoteStyle) -> Self {
        Self {
            quote_style,
            ..self.clone()
        }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn quote_char(&self) -> char {
        self.quote_char
    }

    pub fn escape_char(&self) -> Option<char> {
        self.escape_char
    }

    pub fn double_quote(&self) -> bool {
        self.double_quote
    }

    pub fn line_terminator(&self) -> &str {
        &self.line_terminator
    }

    pub fn quote_style(&self) -> QuoteStyle {
        self.quote_style
    }

    /// Whether the first record should be treated as column names
    pub fn has_header(&self) -> bool {
        self.header
    }

    /// This flavor as an option map accepted by [`FlavorConfig::from_options`]
    pub fn to_options(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Take a one-character string option
fn single_char(value: &Value) -> Option<char> {
    let s = value.as_str()?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Named flavor presets for external selection
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    #[default]
    Excel,
    ExcelTab,
    Unix,
    UnixTab,
}

impl Preset {
    /// All presets in declaration order
    pub const ALL: [Preset; 4] = [Preset::Excel, Preset::ExcelTab, Preset::Unix, Preset::UnixTab];

    /// The flavor this preset names
    pub fn flavor(&self) -> FlavorConfig {
        match self {
            Preset::Excel => FlavorConfig::EXCEL,
            Preset::ExcelTab => FlavorConfig::EXCEL_TAB,
            Preset::Unix => FlavorConfig::UNIX,
            Preset::UnixTab => FlavorConfig::UNIX_TAB,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Excel => "excel",
            Preset::ExcelTab => "excel-tab",
            Preset::Unix => "unix",
            Preset::UnixTab => "unix-tab",
        }
    }
}

impl FromStr for Preset {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == normalized || preset.name().replace('-', "") == normalized)
            .ok_or_else(|| crate::Error::configuration(format!("Unknown flavor preset: {}", s)))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test options must be an object"),
        }
    }

    #[test]
    fn test_default_flavor_is_usable_dialect() {
        let flavor = FlavorConfig::default();

        assert_eq!(flavor.delimiter(), ',');
        assert_eq!(flavor.quote_char(), '"');
        assert!(flavor.double_quote());
        assert_eq!(flavor.line_terminator(), "\r\n");
        assert_eq!(flavor.quote_style(), QuoteStyle::Minimal);
        assert!(flavor.has_header());
        assert_eq!(flavor, FlavorConfig::EXCEL);
    }

    #[test]
    fn test_tab_presets_override_only_delimiter() {
        assert_eq!(FlavorConfig::EXCEL_TAB, FlavorConfig::EXCEL.with_delimiter('\t'));
        assert_eq!(FlavorConfig::UNIX_TAB, FlavorConfig::UNIX.with_delimiter('\t'));
        assert_ne!(FlavorConfig::UNIX_TAB, FlavorConfig::EXCEL_TAB);
    }

    #[test]
    fn test_unix_preset() {
        let unix = Preset::Unix.flavor();

        assert!(!unix.double_quote());
        assert_eq!(unix.escape_char(), Some('\\'));
        assert_eq!(unix.line_terminator(), "\n");
        assert_eq!(unix.quote_style(), QuoteStyle::NonNumeric);
    }

    #[test]
    fn test_from_options_overrides_recognized_keys() {
        let flavor = FlavorConfig::from_options(&options(json!({
            "delimiter": "|",
            "quoteChar": "'",
            "escapeChar": null,
            "doubleQuote": false,
            "quoteStyle": "quote_all",
            "lineTerminator": "\n",
            "header": false
        })));

        assert_eq!(flavor.delimiter(), '|');
        assert_eq!(flavor.quote_char(), '\'');
        assert_eq!(flavor.escape_char(), None);
        assert!(!flavor.double_quote());
        assert_eq!(flavor.quote_style(), QuoteStyle::All);
        assert_eq!(flavor.line_terminator(), "\n");
        assert!(!flavor.has_header());
    }

    #[test]
    fn test_unknown_option_keys_are_ignored() {
        let flavor = FlavorConfig::from_options(&options(json!({
            "skipInitialSpace": true,
            "encoding": "latin1"
        })));

        assert_eq!(flavor, FlavorConfig::default());
    }

    #[test]
    fn test_invalid_option_values_fall_back_to_defaults() {
        let flavor = FlavorConfig::from_options(&options(json!({
            "delimiter": ";;",
            "doubleQuote": "sometimes",
            "quoteStyle": "quote_everything",
            "lineTerminator": "",
            "header": 1
        })));

        assert_eq!(flavor, FlavorConfig::default());
    }

    #[test]
    fn test_copy_with_leaves_original_untouched() {
        let base = FlavorConfig::UNIX;
        let copy = base.copy_with(&options(json!({ "delimiter": ";" })));

        assert_eq!(base.delimiter(), ',');
        assert_eq!(copy.delimiter(), ';');
        assert_eq!(copy.line_terminator(), base.line_terminator());
        assert_eq!(copy.quote_style(), base.quote_style());
    }

    #[test]
    fn test_options_round_trip() {
        let flavor = FlavorConfig::UNIX_TAB.with_header(false);
        let rebuilt = FlavorConfig::from_options(&flavor.to_options());

        assert_eq!(rebuilt, flavor);
    }

    #[test]
    fn test_quote_style_parsing() {
        assert_eq!("minimal".parse::<QuoteStyle>().unwrap(), QuoteStyle::Minimal);
        assert_eq!("QUOTE_NONNUMERIC".parse::<QuoteStyle>().unwrap(), QuoteStyle::NonNumeric);
        assert_eq!("non_numeric".parse::<QuoteStyle>().unwrap(), QuoteStyle::NonNumeric);
        assert_eq!("quote_none".parse::<QuoteStyle>().unwrap(), QuoteStyle::None);
        assert!("sometimes".parse::<QuoteStyle>().is_err());
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("excel".parse::<Preset>().unwrap(), Preset::Excel);
        assert_eq!("Excel_Tab".parse::<Preset>().unwrap(), Preset::ExcelTab);
        assert_eq!("unixtab".parse::<Preset>().unwrap(), Preset::UnixTab);
        assert!("libreoffice".parse::<Preset>().is_err());
    }
}
