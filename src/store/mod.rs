//! Record storage.
//!
//! - `record_store` - ordered, id-unique in-memory collection
//! - `event_log` - shared history log handle used by every view
//! - `persist` - JSON file save/load

pub mod event_log;
pub mod persist;
pub mod record_store;

pub use event_log::*;
pub use persist::*;
pub use record_store::*;
