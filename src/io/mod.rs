//! Input/output helpers.
//!
//! - panel CSV write (the output boundary)
//! - panel CSV read-back (`show`)

pub mod panel;

pub use panel::*;
