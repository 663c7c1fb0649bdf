//! Structured logging with session context.
//!
//! `LogContext` renders the session id and active view; every log line
//! starts with it so messages from one session can be correlated.

pub mod structured;

pub use structured::*;
