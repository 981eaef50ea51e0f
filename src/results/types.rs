//! Result type definitions

use serde::{Deserialize, Serialize, Serializer};

use crate::error::AutocompleteError;

/// A single suggestion as returned by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Value put into the input when the suggestion is picked
    pub value: String,
    /// Text displayed in the suggestion list
    pub label: String,
    /// Any other columns, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ResultRow {
    /// Create a new row without extra fields
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add a passthrough field
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Outcome of one autocomplete request.
///
/// Both variants serialize to a JSON array of rows, so callers can render a
/// failure the same way as a list of suggestions.
#[derive(Debug)]
pub enum Completion {
    /// Rows returned by the data source, possibly highlighted
    Suggestions(Vec<ResultRow>),
    /// Request rejected or query failed. `row` carries the term as value and
    /// the user facing message as label.
    Failed {
        row: ResultRow,
        error: AutocompleteError,
    },
}

impl Completion {
    /// Build a failed completion for a term
    pub fn failed(term: &str, message: String, error: AutocompleteError) -> Self {
        Self::Failed {
            row: ResultRow::new(term, message),
            error,
        }
    }

    /// Rows to hand to the caller
    pub fn rows(&self) -> &[ResultRow] {
        match self {
            Self::Suggestions(rows) => rows,
            Self::Failed { row, .. } => std::slice::from_ref(row),
        }
    }

    /// Consume into the rows to hand to the caller
    pub fn into_rows(self) -> Vec<ResultRow> {
        match self {
            Self::Suggestions(rows) => rows,
            Self::Failed { row, .. } => vec![row],
        }
    }

    /// The error that ended the request, if any
    pub fn error(&self) -> Option<&AutocompleteError> {
        match self {
            Self::Suggestions(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl Serialize for Completion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_passthrough_fields() {
        let row: ResultRow = serde_json::from_value(json!({
            "value": "42",
            "label": "Ada Lovelace",
            "email": "ada@example.com",
            "active": true
        }))
        .unwrap();
        assert_eq!(row.value, "42");
        assert_eq!(row.extra.get("email"), Some(&json!("ada@example.com")));

        let back = serde_json::to_value(&row).unwrap();
        assert_eq!(back["active"], json!(true));
        assert_eq!(back["label"], json!("Ada Lovelace"));
    }

    #[test]
    fn test_failed_completion_is_one_row() {
        let completion = Completion::failed(
            "a%b",
            "Term contains invalid characters".to_string(),
            AutocompleteError::InvalidCharacters {
                term: "a%b".to_string(),
            },
        );
        assert!(completion.is_failed());
        assert!(completion.error().is_some());

        let json = serde_json::to_value(&completion).unwrap();
        assert_eq!(
            json,
            json!([{ "value": "a%b", "label": "Term contains invalid characters" }])
        );
    }

    #[test]
    fn test_suggestions_serialize_as_array() {
        let completion = Completion::Suggestions(vec![
            ResultRow::new("1", "one"),
            ResultRow::new("2", "two").with_field("id", json!(2)),
        ]);
        assert!(completion.error().is_none());
        let json = serde_json::to_value(&completion).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(2));
        assert_eq!(json[1]["id"], json!(2));
        assert_eq!(completion.into_rows().len(), 2);
    }
}
