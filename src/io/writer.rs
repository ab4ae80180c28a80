//! Row writer over any byte sink

use super::single_byte;
use crate::flavor::{FlavorConfig, QuoteStyle};
use crate::row::{HeaderRow, Row};
use crate::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Writes rows to a sink honoring the flavor's quoting and line endings
pub struct RowWriter<W: Write> {
    writer: csv::Writer<W>,
    flavor: Arc<FlavorConfig>,
    rows_written: usize,
}

impl RowWriter<File> {
    /// Create (or truncate) a file for writing
    pub fn from_path(path: impl AsRef<Path>, flavor: FlavorConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;
        Self::new(file, flavor)
    }
}

impl<W: Write> RowWriter<W> {
    pub fn new(sink: W, flavor: FlavorConfig) -> Result<Self> {
        let delimiter = single_byte("delimiter", flavor.delimiter())?;
        let quote = single_byte("quoteChar", flavor.quote_char())?;
        let terminator = terminator_for(flavor.line_terminator())?;

        let mut builder = csv::WriterBuilder::new();
        builder
            .flexible(true)
            .has_headers(false)
            .delimiter(delimiter)
            .quote(quote)
            .double_quote(flavor.double_quote())
            .quote_style(quote_style_for(flavor.quote_style()))
            .terminator(terminator);
        if let Some(escape) = flavor.escape_char() {
            builder.escape(single_byte("escapeChar", escape)?);
        }

        Ok(Self {
            writer: builder.from_writer(sink),
            flavor: Arc::new(flavor),
            rows_written: 0,
        })
    }

    pub fn write_header(&mut self, header: &HeaderRow) -> Result<()> {
        debug!("Writing header with {} column(s)", header.len());
        self.write_cells(header.names())
    }

    pub fn write_row(&mut self, row: &Row) -> Result<()> {
        self.write_cells(row.cells())?;
        self.rows_written += 1;
        Ok(())
    }

    fn write_cells(&mut self, cells: &[String]) -> Result<()> {
        self.writer
            .write_record(cells)
            .map_err(|e| Error::csv("Failed to write record", e))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::io("Failed to flush rows", e))
    }

    /// Flush and hand back the sink
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::io("Failed to flush rows", e.into_error()))
    }

    pub fn flavor(&self) -> &FlavorConfig {
        &self.flavor
    }

    /// Data rows written so far (headers are not counted)
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}

fn quote_style_for(style: QuoteStyle) -> csv::QuoteStyle {
    match style {
        QuoteStyle::Minimal => csv::QuoteStyle::Necessary,
        QuoteStyle::All => csv::QuoteStyle::Always,
        QuoteStyle::NonNumeric => csv::QuoteStyle::NonNumeric,
        QuoteStyle::None => csv::QuoteStyle::Never,
    }
}

fn terminator_for(line_terminator: &str) -> Result<csv::Terminator> {
    match line_terminator.as_bytes() {
        b"\r\n" => Ok(csv::Terminator::CRLF),
        [byte] => Ok(csv::Terminator::Any(*byte)),
        _ => Err(Error::configuration(format!(
            "Line terminator {:?} must be CRLF or a single byte",
            line_terminator
        ))),
    }
}
