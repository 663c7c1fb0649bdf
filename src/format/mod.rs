//! Display formatting.
//!
//! - `timestamp` - locale/clock aware date-time rendering
//! - `values` - unit suffixes for monitoring metrics

pub mod timestamp;
pub mod values;

pub use timestamp::*;
pub use values::*;
