//! Error types for termsuggest.
//!
//! Request errors never escape `Autocomplete::create_list`; they are turned
//! into a one-row completion carrying a user facing message. Configuration
//! errors are raised once, when an `Autocomplete` is constructed.

use thiserror::Error;

use crate::config::Messages;

/// Why a single autocomplete request produced no suggestions.
#[derive(Error, Debug)]
pub enum AutocompleteError {
    /// The configured validation pattern does not compile.
    #[error("invalid validation pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The term contains characters matched by the validation pattern.
    #[error("term {term:?} contains invalid characters")]
    InvalidCharacters { term: String },

    /// A setting has a value that cannot be used to build a query.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// The data source failed to run the assembled query.
    #[error("error executing query {sql:?}")]
    Query {
        sql: String,
        #[source]
        source: DataSourceError,
    },
}

impl AutocompleteError {
    /// Validation errors are caused by the term or the settings; everything
    /// else is an execution failure.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Query { .. })
    }

    /// Message shown to the user in place of results.
    ///
    /// Execution errors always map to the generic query error message; the
    /// underlying cause stays in the error value.
    pub fn user_message(&self, messages: &Messages) -> String {
        match self {
            Self::InvalidPattern { .. } => messages.invalid_pattern.clone(),
            Self::InvalidCharacters { .. } => messages.invalid_characters.clone(),
            Self::InvalidParameter { name, .. } => {
                format!("{} ({})", messages.invalid_parameter, name)
            }
            Self::Query { .. } => messages.query_error.clone(),
        }
    }
}

/// Failure reported by a `DataSource`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct DataSourceError {
    pub message: String,
}

impl DataSourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Settings that cannot produce a working autocomplete list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing required option: {0}")]
    Missing(&'static str),

    #[error("term_parts_max is {max} but only {templates} parts_where_sql templates are configured")]
    TooFewTemplates { max: i64, templates: usize },

    #[error(
        "fixed filter {index} ({sql:?}) has {placeholders} placeholders but {params} params"
    )]
    FixedFilterParams {
        index: usize,
        sql: String,
        placeholders: usize,
        params: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let messages = Messages::default();
        let err = AutocompleteError::InvalidParameter {
            name: "term_parts_max",
            value: "1".to_string(),
        };
        assert_eq!(err.user_message(&messages), "Invalid parameter (term_parts_max)");
        assert!(err.is_validation());

        let err = AutocompleteError::Query {
            sql: "SELECT 1".to_string(),
            source: DataSourceError::new("no such table: customers"),
        };
        assert_eq!(err.user_message(&messages), "Error executing query");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_query_error_keeps_source() {
        use std::error::Error as _;

        let err = AutocompleteError::Query {
            sql: "SELECT 1".to_string(),
            source: DataSourceError::new("disk I/O error"),
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("disk I/O error"));
    }
}
