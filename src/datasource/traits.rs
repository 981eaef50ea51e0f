//! Data source trait

use crate::error::DataSourceError;
use crate::results::ResultRow;

/// Value bound to a query placeholder
pub type BindValue = serde_json::Value;

/// Data-access layer that runs the assembled query.
///
/// Calls are synchronous and request scoped: one `execute` per autocomplete
/// request.
pub trait DataSource: Send + Sync {
    /// Bound parameter marker used in every SQL fragment (e.g. `?`)
    fn placeholder(&self) -> &str {
        "?"
    }

    /// Run `sql` with `params` bound in order
    fn execute(&self, sql: &str, params: &[BindValue]) -> Result<Vec<ResultRow>, DataSourceError>;
}

impl<D: DataSource + ?Sized> DataSource for &D {
    fn placeholder(&self) -> &str {
        (**self).placeholder()
    }

    fn execute(&self, sql: &str, params: &[BindValue]) -> Result<Vec<ResultRow>, DataSourceError> {
        (**self).execute(sql, params)
    }
}

impl<D: DataSource + ?Sized> DataSource for Box<D> {
    fn placeholder(&self) -> &str {
        (**self).placeholder()
    }

    fn execute(&self, sql: &str, params: &[BindValue]) -> Result<Vec<ResultRow>, DataSourceError> {
        (**self).execute(sql, params)
    }
}

/// Count non-overlapping occurrences of the placeholder in a fragment
pub fn count_placeholders(sql: &str, placeholder: &str) -> usize {
    if placeholder.is_empty() {
        return 0;
    }
    sql.matches(placeholder).count()
}
