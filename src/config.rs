//! Descriptor file configuration.
//!
//! A descriptor is a JSON document naming the dialect of a file and the
//! fields it holds:
//!
//! ```json
//! {
//!   "preset": "excel",
//!   "dialect": { "delimiter": ";" },
//!   "fields": [
//!     { "name": "id", "type": "integer", "constraints": { "required": true } }
//!   ],
//!   "numberFormat": { "decimalChar": ",", "groupChar": "." },
//!   "booleanPairs": [["nope", "yep"]]
//! }
//! ```

use crate::constants::{DEFAULT_CURRENCY_CHARS, DEFAULT_DECIMAL_CHAR, DEFAULT_GROUP_CHAR};
use crate::flavor::{FlavorConfig, Preset};
use crate::schema::{ColumnSchema, Schema};
use crate::value::{BooleanRegistry, NumberFormat, ValueConverter};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// One declared field: its name plus column properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,

    /// Remaining column properties (`type`, `constraints`, `title`, ...)
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, properties: Value) -> Self {
        let properties = match properties {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            properties,
        }
    }
}

/// How numbers are written in the described file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberFormatConfig {
    pub decimal_char: char,
    pub group_char: char,
    pub currency_chars: String,
}

impl Default for NumberFormatConfig {
    fn default() -> Self {
        Self {
            decimal_char: DEFAULT_DECIMAL_CHAR,
            group_char: DEFAULT_GROUP_CHAR,
            currency_chars: DEFAULT_CURRENCY_CHARS.to_string(),
        }
    }
}

/// Dialect, fields and conversion settings for one kind of file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Preset the dialect options are applied on top of
    #[serde(default)]
    pub preset: Preset,

    /// Flavor option overrides
    #[serde(default)]
    pub dialect: Map<String, Value>,

    /// Declared fields in file order
    #[serde(default)]
    pub fields: Vec<FieldConfig>,

    #[serde(default)]
    pub number_format: NumberFormatConfig,

    /// Extra (falsy, truthy) words on top of the standard pairs
    #[serde(default)]
    pub boolean_pairs: Vec<(String, String)>,
}

impl Config {
    /// Load and validate a descriptor file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read descriptor {}", path.display()), e))?;

        debug!("Loaded descriptor {} ({} bytes)", path.display(), text.len());
        Self::from_json_str(&text)
    }

    /// Parse and validate a descriptor from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)
            .map_err(|e| Error::configuration(format!("Invalid descriptor: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Use a different base preset
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    /// Override one flavor option
    pub fn with_dialect_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.dialect.insert(key.into(), value);
        self
    }

    /// Append a field declaration
    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    /// The described flavor: preset plus dialect overrides
    pub fn flavor(&self) -> FlavorConfig {
        self.preset.flavor().copy_with(&self.dialect)
    }

    /// Column schemas for every declared field
    pub fn schema(&self) -> Result<Schema> {
        let columns = self
            .fields
            .iter()
            .map(|field| {
                ColumnSchema::new(field.name.as_str(), Value::Object(field.properties.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Schema::new(columns))
    }

    /// Converter honoring the number format and extra boolean words
    pub fn converter(&self) -> Result<ValueConverter> {
        let numbers = NumberFormat::new(
            self.number_format.decimal_char,
            self.number_format.group_char,
        )?
        .with_currency_chars(&self.number_format.currency_chars)?;

        let mut booleans = BooleanRegistry::default();
        for (falsy, truthy) in &self.boolean_pairs {
            booleans.register(falsy.as_str(), truthy.as_str());
        }

        Ok(ValueConverter::new(booleans, numbers))
    }

    /// Check that every part of the descriptor can be built
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(Error::configuration("Field names cannot be empty"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::configuration(format!(
                    "Field '{}' is declared more than once",
                    field.name
                )));
            }
        }

        let flavor = self.flavor();
        for (option, value) in [
            ("delimiter", flavor.delimiter()),
            ("quoteChar", flavor.quote_char()),
        ] {
            crate::io::single_byte(option, value)?;
        }
        if flavor.delimiter() == flavor.quote_char() {
            return Err(Error::configuration(format!(
                "Delimiter and quote character must differ (both '{}')",
                flavor.delimiter()
            )));
        }

        self.schema()?;
        self.converter()?;

        debug!(
            "Descriptor valid: preset {}, {} field(s)",
            self.preset,
            self.fields.len()
        );
        Ok(())
    }

    /// Names of the declared fields in order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
