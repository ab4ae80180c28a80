//! Immutable, dual-indexed rows of cell text
//!
//! A [`Row`] owns a fixed-length sequence of cells and the flavor it was read
//! with. Cells are addressable by position and, once a [`HeaderRow`] is
//! attached, by column name.
//!
//! ## Lookup resolution
//!
//! [`Row::get`] takes an explicit [`CellKey`]:
//! - `CellKey::Name` consults the header-derived name mapping first, then falls
//!   back to positional access when the name is a decimal integer
//! - `CellKey::Position` is plain positional access
//!
//! A miss on both paths fails with [`Error::UndefinedIndex`].
//!
//! When header names repeat, the last position carrying a name wins the
//! mapping. Cells under earlier duplicates stay reachable by position only.
//!
//! ## Concurrency
//!
//! Each row carries one traversal cursor. Rows are single-writer,
//! single-reader per instance; clone a row to traverse it independently.

pub mod filter;

#[cfg(test)]
mod tests;

pub use filter::{FilteredRows, RowIteratorExt, RowPredicate};

use crate::flavor::FlavorConfig;
use crate::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Explicit lookup key for [`Row::get`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Position(usize),
    Name(String),
}

impl From<usize> for CellKey {
    fn from(position: usize) -> Self {
        CellKey::Position(position)
    }
}

impl From<&str> for CellKey {
    fn from(name: &str) -> Self {
        CellKey::Name(name.to_string())
    }
}

impl From<String> for CellKey {
    fn from(name: String) -> Self {
        CellKey::Name(name)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKey::Position(position) => write!(f, "{}", position),
            CellKey::Name(name) => f.write_str(name),
        }
    }
}

/// Key of a cell during traversal: its header name if one is attached,
/// otherwise its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKey<'a> {
    Position(usize),
    Name(&'a str),
}

impl RowKey<'_> {
    /// Owned lookup key equivalent to this traversal key
    pub fn to_cell_key(&self) -> CellKey {
        match self {
            RowKey::Position(position) => CellKey::Position(*position),
            RowKey::Name(name) => CellKey::Name((*name).to_string()),
        }
    }
}

impl fmt::Display for RowKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Position(position) => write!(f, "{}", position),
            RowKey::Name(name) => f.write_str(name),
        }
    }
}

/// One decoded record: an ordered, fixed, write-once sequence of cells
#[derive(Debug, Clone)]
pub struct Row {
    cells: Arc<[String]>,
    flavor: Arc<FlavorConfig>,
    header: Option<Arc<HeaderRow>>,
    names: HashMap<String, usize>,
    position: usize,
}

impl Row {
    /// Create a row interpreted with the default flavor
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_flavor(cells, Arc::new(FlavorConfig::default()))
    }

    /// Create a row interpreted with `flavor`
    ///
    /// The cells are copied and indexed contiguously from zero.
    pub fn with_flavor<I, S>(cells: I, flavor: Arc<FlavorConfig>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Arc<[String]> = cells.into_iter().map(Into::into).collect();
        Self {
            cells,
            flavor,
            header: None,
            names: HashMap::new(),
            position: 0,
        }
    }

    /// Attach a header row, returning the row for chaining
    pub fn with_header(mut self, header: Arc<HeaderRow>) -> Self {
        self.attach_header(header);
        self
    }

    /// Attach a header row and build the name mapping
    ///
    /// Header and data lengths are not required to match: extra header names
    /// stay unmapped, extra data cells stay reachable by position only.
    pub fn attach_header(&mut self, header: Arc<HeaderRow>) {
        if header.len() != self.len() {
            warn!(
                "Header length {} does not match row length {}; unmatched cells are positional only",
                header.len(),
                self.len()
            );
        }

        let mut names = HashMap::with_capacity(header.len());
        for (position, name) in header.names().iter().enumerate().take(self.len()) {
            if let Some(previous) = names.insert(name.clone(), position) {
                debug!(
                    "Duplicate header '{}': position {} replaces {}",
                    name, position, previous
                );
            }
        }

        self.names = names;
        self.header = Some(header);
    }

    /// The attached header row, if any
    pub fn header(&self) -> Option<&HeaderRow> {
        self.header.as_deref()
    }

    /// The flavor this row was read with
    pub fn flavor(&self) -> &FlavorConfig {
        &self.flavor
    }

    /// Shared handle to the flavor
    pub fn flavor_handle(&self) -> Arc<FlavorConfig> {
        Arc::clone(&self.flavor)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell text at `position`
    pub fn cell_at(&self, position: usize) -> Result<&str> {
        self.cells
            .get(position)
            .map(String::as_str)
            .ok_or_else(|| Error::index_out_of_range(position, self.len()))
    }

    /// Traversal key at `position`: the header name if one covers it,
    /// otherwise the position itself
    pub fn name_at(&self, position: usize) -> RowKey<'_> {
        match &self.header {
            Some(header) if position < self.len() => match header.names().get(position) {
                Some(name) => RowKey::Name(name.as_str()),
                None => RowKey::Position(position),
            },
            _ => RowKey::Position(position),
        }
    }

    /// Resolve a name or position to cell text
    pub fn get(&self, key: impl Into<CellKey>) -> Result<&str> {
        let key = key.into();
        let position = match &key {
            CellKey::Name(name) => self
                .names
                .get(name)
                .copied()
                .or_else(|| canonical_position(name)),
            CellKey::Position(position) => Some(*position),
        };

        position
            .and_then(|position| self.cells.get(position))
            .map(String::as_str)
            .ok_or_else(|| Error::undefined_index(key.to_string()))
    }

    /// Whether [`Row::get`] would resolve `key`
    pub fn contains(&self, key: impl Into<CellKey>) -> bool {
        self.get(key).is_ok()
    }

    /// Cells are write-once: assignment always fails
    pub fn set_cell(&self, position: usize, _value: impl Into<String>) -> Result<()> {
        Err(Error::immutable_mutation(position))
    }

    /// Cells are write-once: removal always fails
    pub fn remove_cell(&self, position: usize) -> Result<()> {
        Err(Error::immutable_mutation(position))
    }

    /// Join cells with the flavor's delimiter
    pub fn join(&self) -> String {
        let mut buf = [0u8; 4];
        let delimiter = self.flavor.delimiter().encode_utf8(&mut buf);
        self.join_with(delimiter)
    }

    /// Join cells with an explicit delimiter
    pub fn join_with(&self, delimiter: &str) -> String {
        self.cells.join(delimiter)
    }

    /// Borrow the cells in order
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Copy the cells in order
    pub fn to_vec(&self) -> Vec<String> {
        self.cells.to_vec()
    }

    /// Materialize the row as key/value pairs in traversal order
    ///
    /// Keys are header names when a header is attached, otherwise positions.
    /// A repeated key keeps its first slot and takes the last value.
    pub fn to_ordered_map(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = Vec::with_capacity(self.len());
        let mut slots: HashMap<String, usize> = HashMap::with_capacity(self.len());

        for (key, value) in self.iter() {
            let key = key.to_string();
            match slots.get(&key) {
                Some(&slot) => entries[slot].1 = value.to_string(),
                None => {
                    slots.insert(key.clone(), entries.len());
                    entries.push((key, value.to_string()));
                }
            }
        }

        entries
    }

    /// Iterate `(key, cell)` pairs without touching the cursor
    pub fn iter(&self) -> Cells<'_> {
        Cells {
            row: self,
            position: 0,
        }
    }

    // Cursor traversal

    /// Reset the cursor to the first cell and return it
    pub fn rewind(&mut self) -> Option<&str> {
        self.position = 0;
        self.current()
    }

    /// Move the cursor forward and return the new current cell
    pub fn advance(&mut self) -> Option<&str> {
        if self.position < self.len() {
            self.position += 1;
        }
        self.current()
    }

    /// Cell under the cursor
    pub fn current(&self) -> Option<&str> {
        self.cells.get(self.position).map(String::as_str)
    }

    /// Key of the cell under the cursor
    pub fn key(&self) -> Option<RowKey<'_>> {
        self.has_more().then(|| self.name_at(self.position))
    }

    /// Whether the cursor points at a cell
    pub fn has_more(&self) -> bool {
        self.position < self.len()
    }
}

/// Rows compare by cell content only
impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for Row {}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join())
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let entries = self.to_ordered_map();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = (RowKey<'a>, &'a str);
    type IntoIter = Cells<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a row's `(key, cell)` pairs
#[derive(Debug, Clone)]
pub struct Cells<'a> {
    row: &'a Row,
    position: usize,
}

impl<'a> Iterator for Cells<'a> {
    type Item = (RowKey<'a>, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.row.cells.get(self.position)?;
        let key = self.row.name_at(self.position);
        self.position += 1;
        Some((key, cell.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.row.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cells<'_> {}

/// A row whose cells are column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRow {
    row: Row,
}

impl HeaderRow {
    /// Create a header row with the default flavor
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { row: Row::new(names) }
    }

    /// Create a header row with an explicit flavor
    pub fn with_flavor<I, S>(names: I, flavor: Arc<FlavorConfig>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            row: Row::with_flavor(names, flavor),
        }
    }

    /// Column names in order
    pub fn names(&self) -> &[String] {
        self.row.cells()
    }

    pub fn len(&self) -> usize {
        self.row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row.is_empty()
    }

    /// Position a name resolves to (the last occurrence of a repeated name)
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.names().iter().rposition(|candidate| candidate == name)
    }

    /// Names that occur more than once, in first-seen order
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for name in self.names() {
            let count = counts.entry(name.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(name.as_str());
            }
        }
        order
    }

    /// The underlying row
    pub fn as_row(&self) -> &Row {
        &self.row
    }

    pub fn into_row(self) -> Row {
        self.row
    }
}

impl From<Row> for HeaderRow {
    fn from(mut row: Row) -> Self {
        // A header never carries a header of its own
        row.header = None;
        row.names.clear();
        Self { row }
    }
}

impl fmt::Display for HeaderRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.row, f)
    }
}

/// Position written as a plain decimal ("1", not "01" or "+1")
fn canonical_position(name: &str) -> Option<usize> {
    name.parse::<usize>()
        .ok()
        .filter(|position| position.to_string() == name)
}
