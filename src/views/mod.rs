//! Dashboard view state.
//!
//! Each view owns its filter/form state and reads the record core:
//! - `history` - operation history log with search, KPIs and re-run
//! - `monitoring` - equipment log with form, period filter and delete confirmation
//! - `rerun` - dispatch of a stored event back to an action
//! - `notify` - transient toast messages

pub mod history;
pub mod monitoring;
pub mod notify;
pub mod rerun;

pub use history::*;
pub use monitoring::*;
pub use notify::*;
pub use rerun::*;
