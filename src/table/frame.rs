//! Column-oriented table keyed by calendar date.
//!
//! Columns are addressed by name, never by position, so outer joins cannot
//! pick up order-dependent bugs. Cells are `Option<String>`: `None` is the
//! explicit missing marker, and a source value is otherwise carried verbatim
//! (including FRED's `"."` no-data sentinel).

use chrono::NaiveDate;

/// Join key column name used in headers and exports.
pub const DATE_COLUMN: &str = "date";

/// Request-window echo columns present on every raw FRED observation.
pub const REALTIME_START: &str = "realtime_start";
pub const REALTIME_END: &str = "realtime_end";

/// A single cell; `None` marks a (date, column) combination absent from the
/// source series.
pub type Cell = Option<String>;

/// A named column of cells, one per row key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Fill only cells that are currently missing; existing values are never
    /// overwritten.
    pub(crate) fn fill_missing(&mut self, other: &[Cell]) {
        for (dst, src) in self.cells.iter_mut().zip(other) {
            if dst.is_none() {
                *dst = src.clone();
            }
        }
    }
}

/// Date-keyed table: row keys sorted ascending and unique, columns kept in
/// introduction order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl Frame {
    /// Build a frame from presorted parts.
    ///
    /// Callers must supply strictly increasing dates and columns whose cell
    /// count matches the date count.
    pub(crate) fn from_parts(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Self {
        debug_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(columns.iter().all(|c| c.cells.len() == dates.len()));
        Self { dates, columns }
    }

    pub(crate) fn into_parts(self) -> (Vec<NaiveDate>, Vec<Column>) {
        (self.dates, self.columns)
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Header row: `date` first, then columns in introduction order.
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(DATE_COLUMN)
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    pub fn row_index(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Cell at (column, date).
    ///
    /// `None` means the column or date is not present at all; `Some(&None)`
    /// means the row exists but the series has no value there.
    pub fn cell(&self, column: &str, date: NaiveDate) -> Option<&Cell> {
        let row = self.row_index(date)?;
        self.column(column).map(|c| &c.cells[row])
    }
}
