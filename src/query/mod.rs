//! Query building module
//!
//! Turns a user's term into a parameterized WHERE clause:
//! - the term is trimmed and whitespace collapsed
//! - an optional validation pattern rejects disallowed characters
//! - the term is split into parts on a delimiter
//! - every part gets its own SQL fragment and LIKE values

mod builder;
pub mod term;

pub use builder::{QueryBuilder, QueryPlan};
