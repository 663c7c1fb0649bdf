//! Record queries.
//!
//! - `filter` - text/date/category filter shared by both views
//! - `aggregate` - per-category KPI counts
//! - `period` - relative date window used by the monitoring view

pub mod aggregate;
pub mod filter;
pub mod period;

pub use aggregate::*;
pub use filter::*;
pub use period::*;
