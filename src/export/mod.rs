//! CSV export.
//!
//! - `csv` - column-driven serializer and download artifact
//! - `columns` - the history and monitoring column sets

pub mod columns;
pub mod csv;

pub use self::csv::*;
pub use columns::*;
