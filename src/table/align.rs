//! Outer-join alignment of normalized series frames on the date key.
//!
//! `merge` folds one frame into an accumulated panel:
//!
//! - the output date set is the sorted union of both inputs' date sets;
//!   no date seen in any input is ever dropped
//! - a column new to the accumulator is appended, so column order follows
//!   the order series were fetched in
//! - a column already present (the shared realtime echo pair) only fills
//!   cells that are still missing; an existing cell is never overwritten
//! - absent (date, column) combinations hold the explicit missing marker,
//!   never a default
//!
//! With distinct value columns per series, the fold is associative and
//! commutative with respect to the date key: any grouping or ordering of
//! inputs yields the same rows and cell values, up to column order.

use chrono::NaiveDate;

use crate::table::frame::{Cell, Column, Frame};

/// Align any number of frames onto a shared date axis.
///
/// No tables yields an empty frame; a single table is returned unchanged.
pub fn align(tables: Vec<Frame>) -> Frame {
    let mut iter = tables.into_iter();
    let Some(first) = iter.next() else {
        return Frame::default();
    };
    iter.fold(first, |acc, next| merge(acc, &next))
}

/// Outer-join `right` into `left` on the date key.
pub fn merge(left: Frame, right: &Frame) -> Frame {
    let mut dates: Vec<NaiveDate> = left.dates().iter().chain(right.dates()).copied().collect();
    dates.sort_unstable();
    dates.dedup();

    // Re-key the accumulated columns onto the union axis.
    let (left_dates, left_columns) = left.into_parts();
    let mut columns: Vec<Column> = left_columns
        .into_iter()
        .map(|c| {
            let cells = rekey(c.cells(), &left_dates, &dates);
            Column::new(c.name(), cells)
        })
        .collect();

    // Fold the right table in: new columns are appended, shared columns only
    // fill cells that are still missing.
    for col in right.columns() {
        let rekeyed = rekey(col.cells(), right.dates(), &dates);
        match columns.iter_mut().find(|c| c.name() == col.name()) {
            Some(existing) => existing.fill_missing(&rekeyed),
            None => columns.push(Column::new(col.name(), rekeyed)),
        }
    }

    Frame::from_parts(dates, columns)
}

fn rekey(cells: &[Cell], from_dates: &[NaiveDate], onto: &[NaiveDate]) -> Vec<Cell> {
    onto.iter()
        .map(|d| match from_dates.binary_search(d) {
            Ok(i) => cells[i].clone(),
            Err(_) => None,
        })
        .collect()
}
