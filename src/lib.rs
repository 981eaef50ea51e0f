//! termsuggest: autocomplete suggestion lists from SQL
//!
//! Splits a user's term into parts, builds a parameterized WHERE clause
//! matching each part, runs it through a caller supplied data source and
//! highlights the matched parts in the returned labels.

pub mod accents;
pub mod autocomplete;
pub mod config;
pub mod datasource;
pub mod error;
pub mod highlight;
pub mod query;
pub mod results;

pub use autocomplete::Autocomplete;
pub use config::{AutocompleteSettings, Settings};
pub use datasource::DataSource;
pub use error::{AutocompleteError, ConfigError, DataSourceError};
pub use highlight::Highlighter;
pub use query::{QueryBuilder, QueryPlan};
pub use results::{Completion, ResultRow};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
