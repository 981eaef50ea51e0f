//! Result types
//!
//! Rows returned by the data source and the completion handed back to the
//! caller.

mod types;

pub use types::*;
