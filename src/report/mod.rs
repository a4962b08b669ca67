//! Tabular report
//!
//! Display metadata derived from flattened records, and the rows handed
//! to a renderer.

pub mod classify;
pub mod rows;

pub use classify::{Cardinality, TypeCategory};
pub use rows::{Column, Report, ReportRow, RowKind, RowStyle};
