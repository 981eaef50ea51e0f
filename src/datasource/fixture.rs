//! Replay data source
//!
//! Returns a fixed set of rows for every query and remembers what it was
//! asked to run. Used by the command line tool to preview highlighting on
//! exported rows, and by tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::traits::{BindValue, DataSource};
use crate::error::DataSourceError;
use crate::results::ResultRow;

/// A query received by a `StaticDataSource`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub sql: String,
    pub params: Vec<BindValue>,
}

/// Data source that replays a fixed row set
pub struct StaticDataSource {
    placeholder: String,
    outcome: Result<Vec<ResultRow>, DataSourceError>,
    executions: AtomicUsize,
    last_query: Mutex<Option<RecordedQuery>>,
}

impl StaticDataSource {
    /// Replay `rows` for every query
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self {
            placeholder: "?".to_string(),
            outcome: Ok(rows),
            executions: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    /// Fail every query with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(DataSourceError::new(message)),
            ..Self::new(Vec::new())
        }
    }

    /// Load the rows to replay from a JSON array
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Use a different placeholder marker
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Number of queries executed so far
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::Relaxed)
    }

    /// The most recent query, if any
    pub fn last_query(&self) -> Option<RecordedQuery> {
        self.last_query
            .lock()
            .map(|q| q.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl DataSource for StaticDataSource {
    fn placeholder(&self) -> &str {
        &self.placeholder
    }

    fn execute(&self, sql: &str, params: &[BindValue]) -> Result<Vec<ResultRow>, DataSourceError> {
        self.executions.fetch_add(1, Ordering::Relaxed);
        let recorded = RecordedQuery {
            sql: sql.to_string(),
            params: params.to_vec(),
        };
        match self.last_query.lock() {
            Ok(mut last) => *last = Some(recorded),
            Err(poisoned) => *poisoned.into_inner() = Some(recorded),
        }
        self.outcome.clone()
    }
}
