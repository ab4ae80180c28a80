//! Predicate filtering over row sequences
//!
//! [`FilteredRows`] yields only the rows accepted by every predicate. The
//! predicates run left to right and stop at the first rejection, so later
//! predicates never see a row an earlier one refused.

use super::Row;
use std::fmt;
use std::rc::Rc;

/// A stateless test applied to each row
pub type RowPredicate = Rc<dyn Fn(&Row) -> bool>;

/// Lazy iterator over the rows of `I` that pass all predicates
///
/// Cloning a `FilteredRows` over a cloneable source restarts the filter
/// from the source's current position.
#[derive(Clone)]
pub struct FilteredRows<I> {
    inner: I,
    predicates: Vec<RowPredicate>,
}

impl<I> FilteredRows<I> {
    pub fn new(inner: I, predicates: Vec<RowPredicate>) -> Self {
        Self { inner, predicates }
    }

    /// Append a predicate, evaluated after the existing ones
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Row) -> bool + 'static,
    {
        self.predicates.push(Rc::new(predicate));
        self
    }

    /// Whether `row` passes every predicate (short-circuits on the first failure)
    pub fn accepts(&self, row: &Row) -> bool {
        self.predicates.iter().all(|predicate| predicate(row))
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I> FilteredRows<I>
where
    I: Iterator<Item = Row>,
{
    /// Drain the accepted rows into plain cell vectors
    pub fn into_vecs(self) -> Vec<Vec<String>> {
        self.map(|row| row.to_vec()).collect()
    }
}

impl<I> Iterator for FilteredRows<I>
where
    I: Iterator<Item = Row>,
{
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let predicates = &self.predicates;
        self.inner
            .find(|row| predicates.iter().all(|predicate| predicate(row)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<I> fmt::Debug for FilteredRows<I>
where
    I: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredRows")
            .field("inner", &self.inner)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// Adapter for filtering any iterator of rows
pub trait RowIteratorExt: Iterator<Item = Row> + Sized {
    fn filter_rows(self, predicates: Vec<RowPredicate>) -> FilteredRows<Self> {
        FilteredRows::new(self, predicates)
    }
}

impl<I> RowIteratorExt for I where I: Iterator<Item = Row> {}

/// Accept rows with at least `count` cells
pub fn min_cells(count: usize) -> RowPredicate {
    Rc::new(move |row: &Row| row.len() >= count)
}

/// Accept rows whose cell at `position` exists and is not empty
pub fn cell_non_empty(position: usize) -> RowPredicate {
    Rc::new(move |row: &Row| row.cell_at(position).is_ok_and(|cell| !cell.is_empty()))
}

/// Accept rows where the cell under `column` equals `expected`
pub fn cell_equals(column: impl Into<super::CellKey>, expected: impl Into<String>) -> RowPredicate {
    let column = column.into();
    let expected = expected.into();
    Rc::new(move |row: &Row| row.get(column.clone()).is_ok_and(|cell| cell == expected))
}
