//! Autocomplete lists
//!
//! Builds the query for a term, runs it on a data source and highlights the
//! labels of the returned rows. Every outcome, including rejected terms and
//! failed queries, is returned as a list of rows.

use tracing::{debug, error, warn};

use crate::config::{AutocompleteSettings, Messages, TermPartsMax};
use crate::datasource::{count_placeholders, DataSource};
use crate::error::{AutocompleteError, ConfigError};
use crate::highlight::{HighlightMarkup, Highlighter, SpanClass};
use crate::query::{QueryBuilder, QueryPlan};
use crate::results::Completion;

/// An autocomplete list bound to a data source.
///
/// Holds only configuration; each call to `create_list` works on its own
/// query plan, so one instance can serve many requests.
pub struct Autocomplete<D: DataSource> {
    builder: QueryBuilder,
    highlighter: Option<Highlighter>,
    messages: Messages,
    data_source: D,
}

impl<D: DataSource> Autocomplete<D> {
    /// Validate `settings` against the data source and create the list
    pub fn new(settings: &AutocompleteSettings, data_source: D) -> Result<Self, ConfigError> {
        validate(settings, data_source.placeholder())?;

        let highlighter = settings.highlight_results.then(|| {
            Highlighter::new(SpanClass::new(&settings.highlight_class))
                .accent_insensitive(settings.accent_insensitive)
        });

        Ok(Self {
            builder: QueryBuilder::new(settings),
            highlighter,
            messages: settings.messages.clone(),
            data_source,
        })
    }

    /// Use different highlight markup. Has no effect when highlighting is
    /// disabled in the settings.
    pub fn with_markup(mut self, markup: impl HighlightMarkup + 'static) -> Self {
        let accent_insensitive = self
            .highlighter
            .as_ref()
            .map(Highlighter::is_accent_insensitive);
        if let Some(accent_insensitive) = accent_insensitive {
            self.highlighter = Some(Highlighter::new(markup).accent_insensitive(accent_insensitive));
        }
        self
    }

    /// The data source queries are sent to
    pub fn data_source(&self) -> &D {
        &self.data_source
    }

    /// Build the query for a term without running it
    pub fn plan(&self, term: &str) -> Result<QueryPlan, AutocompleteError> {
        self.builder.build(term, self.data_source.placeholder())
    }

    /// Produce the suggestion list for a term
    pub fn create_list(&self, term: &str) -> Completion {
        let plan = match self.plan(term) {
            Ok(plan) => plan,
            Err(e) => return self.fail(&self.builder.normalize(term), e),
        };

        let mut rows = match self.data_source.execute(&plan.sql, &plan.bound_params) {
            Ok(rows) => rows,
            Err(source) => {
                error!("Error executing query: {} ({})", plan.sql, source);
                let e = AutocompleteError::Query {
                    sql: plan.sql,
                    source,
                };
                return self.fail(&plan.term, e);
            }
        };
        debug!("Query for {:?} returned {} rows", plan.term, rows.len());

        if let Some(highlighter) = &self.highlighter {
            if !rows.is_empty() {
                highlighter.apply(&mut rows, &plan.parts);
            }
        }

        Completion::Suggestions(rows)
    }

    fn fail(&self, term: &str, error: AutocompleteError) -> Completion {
        if error.is_validation() {
            warn!("Rejected autocomplete term {:?}: {}", term, error);
        }
        let message = error.user_message(&self.messages);
        Completion::failed(term, message, error)
    }
}

/// Checks done once per configuration rather than per request
fn validate(settings: &AutocompleteSettings, placeholder: &str) -> Result<(), ConfigError> {
    if settings.select_sql.trim().is_empty() {
        return Err(ConfigError::Missing("select_sql"));
    }
    if settings.parts_where_sql.is_empty() {
        return Err(ConfigError::Missing("parts_where_sql"));
    }

    if let (Some(_), max @ TermPartsMax::Max(n)) = (settings.delimiter(), settings.term_parts_max) {
        // unusable values are reported per request
        if max.is_valid() && settings.parts_where_sql.len() < n as usize {
            return Err(ConfigError::TooFewTemplates {
                max: n,
                templates: settings.parts_where_sql.len(),
            });
        }
    }

    for (index, filter) in settings.fixed_filters.iter().enumerate() {
        let placeholders = count_placeholders(&filter.sql, placeholder);
        if placeholders != filter.params.len() {
            return Err(ConfigError::FixedFilterParams {
                index,
                sql: filter.sql.clone(),
                placeholders,
                params: filter.params.len(),
            });
        }
    }

    Ok(())
}
