//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - validated observation queries (`SeriesQuery`, `SeriesRequest`)
//! - the known-series catalog (`KnownSeries`)
//! - run configuration (`PullConfig`)

pub mod types;

pub use types::*;
