//! Remove non-semantic provenance columns after alignment.

use crate::table::frame::Frame;

/// Project away the named columns, leaving the rest in their original order.
///
/// Names that are not present are ignored, so stripping is idempotent: the
/// canonical panel can be re-stripped without effect.
pub fn strip(table: Frame, columns_to_remove: &[&str]) -> Frame {
    let (dates, columns) = table.into_parts();
    let kept = columns
        .into_iter()
        .filter(|c| !columns_to_remove.contains(&c.name()))
        .collect();
    Frame::from_parts(dates, kept)
}
