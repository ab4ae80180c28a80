//! Row reader over any byte source

use super::single_byte;
use crate::flavor::FlavorConfig;
use crate::row::{HeaderRow, Row};
use crate::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Tokenizes a byte source into [`Row`]s using a flavor's rules
///
/// When the flavor has a header, the first record becomes the
/// [`HeaderRow`] shared by every data row that follows. Records may have
/// differing lengths.
pub struct RowReader<R: Read> {
    reader: csv::Reader<R>,
    flavor: Arc<FlavorConfig>,
    header: Option<Arc<HeaderRow>>,
    record: csv::StringRecord,
    rows_read: usize,
}

impl RowReader<File> {
    /// Open a file for reading
    pub fn from_path(path: impl AsRef<Path>, flavor: FlavorConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
        Self::new(file, flavor)
    }
}

impl<R: Read> RowReader<R> {
    pub fn new(source: R, flavor: FlavorConfig) -> Result<Self> {
        Self::with_shared_flavor(source, Arc::new(flavor))
    }

    /// Create a reader whose rows share an existing flavor handle
    pub fn with_shared_flavor(source: R, flavor: Arc<FlavorConfig>) -> Result<Self> {
        let delimiter = single_byte("delimiter", flavor.delimiter())?;
        let quote = single_byte("quoteChar", flavor.quote_char())?;
        let escape = match flavor.escape_char() {
            Some(c) if !flavor.double_quote() => Some(single_byte("escapeChar", c)?),
            _ => None,
        };

        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .quote(quote)
            .escape(escape)
            .double_quote(flavor.double_quote())
            .from_reader(source);

        let mut row_reader = Self {
            reader,
            flavor,
            header: None,
            record: csv::StringRecord::new(),
            rows_read: 0,
        };

        if row_reader.flavor.has_header() {
            row_reader.read_header()?;
        }

        Ok(row_reader)
    }

    fn read_header(&mut self) -> Result<()> {
        if !self.read_record()? {
            debug!("Source is empty, no header row");
            return Ok(());
        }

        let header = HeaderRow::with_flavor(self.record.iter(), Arc::clone(&self.flavor));
        debug!("Read header with {} column(s)", header.len());
        self.header = Some(Arc::new(header));
        Ok(())
    }

    fn read_record(&mut self) -> Result<bool> {
        self.reader.read_record(&mut self.record).map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or_default();
            Error::csv(format!("Failed to read record at line {}", line), e)
        })
    }

    /// Next data row, or `None` at the end of the source
    pub fn read_row(&mut self) -> Result<Option<Row>> {
        if !self.read_record()? {
            return Ok(None);
        }

        let mut row = Row::with_flavor(self.record.iter(), Arc::clone(&self.flavor));
        if let Some(header) = &self.header {
            row.attach_header(Arc::clone(header));
        }
        self.rows_read += 1;
        Ok(Some(row))
    }

    pub fn header(&self) -> Option<&Arc<HeaderRow>> {
        self.header.as_ref()
    }

    pub fn flavor(&self) -> &FlavorConfig {
        &self.flavor
    }

    /// Data rows read so far (the header is not counted)
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_row().transpose()
    }
}
