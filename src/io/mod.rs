//! Reading and writing rows through the `csv` tokenizer
//!
//! The tokenizer only understands single-byte dialect characters, so a
//! flavor whose delimiter, quote or escape is not ASCII is rejected with a
//! configuration error before any data is read or written.

pub mod reader;
pub mod writer;

pub use reader::RowReader;
pub use writer::RowWriter;

use crate::flavor::FlavorConfig;
use crate::row::Row;
use crate::{Error, Result};

/// Read every row of `text` under `flavor`
pub fn read_str(text: &str, flavor: FlavorConfig) -> Result<Vec<Row>> {
    RowReader::new(text.as_bytes(), flavor)?.collect()
}

/// Render rows (and the first row's header, if the flavor has one) as text
pub fn write_string<'a>(
    rows: impl IntoIterator<Item = &'a Row>,
    flavor: FlavorConfig,
) -> Result<String> {
    let mut writer = RowWriter::new(Vec::new(), flavor)?;
    let mut header_written = false;

    for row in rows {
        if !header_written {
            if let Some(header) = row.header() {
                if writer.flavor().has_header() {
                    writer.write_header(header)?;
                }
            }
            header_written = true;
        }
        writer.write_row(row)?;
    }

    let bytes = writer.into_inner()?;
    String::from_utf8(bytes)
        .map_err(|e| Error::configuration(format!("Written rows are not UTF-8: {}", e)))
}

/// Dialect character as the single byte the tokenizer needs
pub(crate) fn single_byte(option: &str, value: char) -> Result<u8> {
    if value.is_ascii() {
        Ok(value as u8)
    } else {
        Err(Error::configuration(format!(
            "{} '{}' must be a single-byte (ASCII) character",
            option, value
        )))
    }
}
