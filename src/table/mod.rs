//! The tabular core of the pipeline.
//!
//! - column-oriented, date-keyed tables (`frame`)
//! - per-series response flattening (`normalize`)
//! - outer-join alignment across series (`align`)
//! - provenance column removal (`strip`)

pub mod align;
pub mod frame;
pub mod normalize;
pub mod strip;

pub use align::{align, merge};
pub use frame::{Cell, Column, DATE_COLUMN, Frame, REALTIME_END, REALTIME_START};
pub use normalize::normalize;
pub use strip::strip;
