//! Query plan assembly

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use super::term;
use crate::config::{AutocompleteSettings, ComparisonOperator, FixedFilter, TermPartsMax};
use crate::datasource::{count_placeholders, BindValue};
use crate::error::AutocompleteError;

/// A query assembled for one term. Built per request and never reused.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPlan {
    /// The term after trimming and whitespace collapsing
    pub term: String,
    /// Term parts, in order
    pub parts: Vec<String>,
    /// Fixed filter fragments followed by one fragment per part
    pub where_fragments: Vec<String>,
    /// One value per placeholder across `where_fragments`, in order
    pub bound_params: Vec<BindValue>,
    /// Complete query text
    pub sql: String,
}

impl QueryPlan {
    /// `WHERE a AND b ...`, or an empty string when there are no fragments
    pub fn where_clause(&self) -> String {
        where_clause(&self.where_fragments)
    }
}

fn where_clause(fragments: &[String]) -> String {
    if fragments.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", fragments.join(" AND "))
    }
}

/// Compiled validation pattern
#[derive(Debug, Clone)]
enum TermFilter {
    Disabled,
    Pattern(Regex),
    Malformed { pattern: String, reason: String },
}

impl TermFilter {
    fn new(pattern: Option<&str>) -> Self {
        match pattern.filter(|p| !p.is_empty()) {
            None => Self::Disabled,
            Some(pattern) => match Regex::new(pattern) {
                Ok(re) => Self::Pattern(re),
                Err(e) => {
                    warn!("Validation pattern {:?} does not compile: {}", pattern, e);
                    Self::Malformed {
                        pattern: pattern.to_string(),
                        reason: e.to_string(),
                    }
                }
            },
        }
    }

    /// The pattern lists characters that are not allowed, so any match
    /// rejects the term.
    fn check(&self, term: &str) -> Result<(), AutocompleteError> {
        match self {
            Self::Disabled => Ok(()),
            Self::Pattern(re) if re.is_match(term) => Err(AutocompleteError::InvalidCharacters {
                term: term.to_string(),
            }),
            Self::Pattern(_) => Ok(()),
            Self::Malformed { pattern, reason } => Err(AutocompleteError::InvalidPattern {
                pattern: pattern.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Turns a raw term into a `QueryPlan`
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    select_sql: String,
    order_sql: String,
    parts_where_sql: Vec<String>,
    fixed_filters: Vec<FixedFilter>,
    delimiter: Option<String>,
    parts_max: TermPartsMax,
    operator: ComparisonOperator,
    trim_term: bool,
    collapse_whitespace: bool,
    filter: TermFilter,
}

impl QueryBuilder {
    /// Create a builder from settings. The validation pattern is compiled
    /// here; a pattern that does not compile rejects every term.
    pub fn new(settings: &AutocompleteSettings) -> Self {
        Self {
            select_sql: settings.select_sql.clone(),
            order_sql: settings.order_sql.clone(),
            parts_where_sql: settings.parts_where_sql.clone(),
            fixed_filters: settings.fixed_filters.clone(),
            delimiter: settings.delimiter().map(str::to_string),
            parts_max: settings.term_parts_max,
            operator: settings.comparison_operator,
            trim_term: settings.trim_term,
            collapse_whitespace: settings.collapse_whitespace,
            filter: TermFilter::new(settings.validation_pattern.as_deref()),
        }
    }

    /// Normalize and validate a term, then assemble its query
    pub fn build(&self, raw_term: &str, placeholder: &str) -> Result<QueryPlan, AutocompleteError> {
        let term = self.normalize(raw_term);
        self.filter.check(&term)?;

        let mut where_fragments = Vec::new();
        let mut bound_params = Vec::new();

        for filter in &self.fixed_filters {
            where_fragments.push(filter.sql.clone());
        }
        for filter in &self.fixed_filters {
            bound_params.extend(filter.params.iter().cloned());
        }

        let limit = match (self.delimiter.as_deref(), self.parts_max) {
            (None, _) | (Some(_), TermPartsMax::Any) => None,
            (Some(_), max @ TermPartsMax::Max(n)) => {
                if !max.is_valid() {
                    return Err(AutocompleteError::InvalidParameter {
                        name: "term_parts_max",
                        value: max.to_string(),
                    });
                }
                Some(n as usize)
            }
        };

        let parts = term::split(&term, self.delimiter.as_deref(), limit);
        for (index, part) in parts.iter().enumerate() {
            let template = self.template(index, limit.is_some())?;
            where_fragments.push(template.to_string());

            let occurrences = count_placeholders(template, placeholder);
            let value = term::bind_value(part, self.operator);
            bound_params.extend(std::iter::repeat(BindValue::String(value)).take(occurrences));
        }

        let sql = format!(
            "{} {} {}",
            self.select_sql,
            where_clause(&where_fragments),
            self.order_sql
        );
        debug!(
            "Built query for {:?}: {} ({} params)",
            term,
            sql,
            bound_params.len()
        );

        Ok(QueryPlan {
            parts: parts.into_iter().map(str::to_string).collect(),
            term,
            where_fragments,
            bound_params,
            sql,
        })
    }

    /// Apply the configured trimming and whitespace collapsing
    pub fn normalize(&self, term: &str) -> String {
        term::normalize(term, self.trim_term, self.collapse_whitespace)
    }

    fn template(&self, index: usize, per_part: bool) -> Result<&str, AutocompleteError> {
        let index = if per_part { index } else { 0 };
        self.parts_where_sql
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| AutocompleteError::InvalidParameter {
                name: "parts_where_sql",
                value: format!("no template for part {}", index),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(parts_where_sql: &[&str]) -> AutocompleteSettings {
        AutocompleteSettings::new(
            "SELECT id AS value, name AS label FROM customers",
            parts_where_sql.iter().map(|s| s.to_string()).collect(),
            "ORDER BY name LIMIT 10",
        )
    }

    fn placeholder_total(plan: &QueryPlan) -> usize {
        plan.where_fragments
            .iter()
            .map(|f| count_placeholders(f, "?"))
            .sum()
    }

    #[test]
    fn test_any_parts_contains() {
        let builder = QueryBuilder::new(&settings(&["name LIKE ?"]));
        let plan = builder.build("a b", "?").unwrap();

        assert_eq!(plan.where_clause(), "WHERE name LIKE ? AND name LIKE ?");
        assert_eq!(plan.bound_params, vec![json!("%a%"), json!("%b%")]);
        assert_eq!(plan.parts, vec!["a", "b"]);
        assert_eq!(
            plan.sql,
            "SELECT id AS value, name AS label FROM customers WHERE name LIKE ? AND name LIKE ? ORDER BY name LIMIT 10"
        );
    }

    #[test]
    fn test_starts_with_operator() {
        let mut s = settings(&["lower(name) LIKE ?"]);
        s.comparison_operator = ComparisonOperator::StartsWithTerm;
        let plan = QueryBuilder::new(&s).build("Zoë", "?").unwrap();
        assert_eq!(plan.bound_params, vec![json!("zoe%")]);
    }

    #[test]
    fn test_template_with_repeated_placeholders() {
        let builder = QueryBuilder::new(&settings(&["(lower(first) LIKE ? OR lower(last) LIKE ?)"]));
        let plan = builder.build("ann lee", "?").unwrap();

        assert_eq!(plan.where_fragments.len(), 2);
        assert_eq!(
            plan.bound_params,
            vec![json!("%ann%"), json!("%ann%"), json!("%lee%"), json!("%lee%")]
        );
        assert_eq!(plan.bound_params.len(), placeholder_total(&plan));
    }

    #[test]
    fn test_bounded_parts_use_own_templates() {
        let mut s = settings(&["lastname LIKE ?", "firstname LIKE ?"]);
        s.term_parts_max = TermPartsMax::Max(2);
        let plan = QueryBuilder::new(&s).build("van der berg", "?").unwrap();

        assert_eq!(plan.parts, vec!["van", "der berg"]);
        assert_eq!(
            plan.where_fragments,
            vec!["lastname LIKE ?".to_string(), "firstname LIKE ?".to_string()]
        );
        assert_eq!(plan.bound_params, vec![json!("%van%"), json!("%der berg%")]);
    }

    #[test]
    fn test_bounded_fragment_count_matches_parts() {
        let mut s = settings(&["a LIKE ?", "b LIKE ?", "c LIKE ?"]);
        s.term_parts_max = TermPartsMax::Max(3);
        let builder = QueryBuilder::new(&s);

        for (term, expected) in [("x", 1), ("x y", 2), ("x y z", 3), ("x y z w", 3)] {
            let plan = builder.build(term, "?").unwrap();
            assert_eq!(plan.where_fragments.len(), expected, "term {:?}", term);
            assert_eq!(plan.parts.len(), expected);
            assert_eq!(plan.bound_params.len(), placeholder_total(&plan));
        }
    }

    #[test]
    fn test_invalid_parts_max_rejected() {
        for max in [1, 0, -2, 100] {
            let mut s = settings(&["name LIKE ?"]);
            s.term_parts_max = TermPartsMax::Max(max);
            let err = QueryBuilder::new(&s).build("a b", "?").unwrap_err();
            assert!(matches!(
                err,
                AutocompleteError::InvalidParameter { name: "term_parts_max", .. }
            ));
        }
    }

    #[test]
    fn test_no_delimiter_single_part() {
        let mut s = settings(&["name LIKE ?"]);
        s.term_parts_delimiter = None;
        s.term_parts_max = TermPartsMax::Max(1);
        let plan = QueryBuilder::new(&s).build("new york", "?").unwrap();

        assert_eq!(plan.parts, vec!["new york"]);
        assert_eq!(plan.bound_params, vec![json!("%new york%")]);
    }

    #[test]
    fn test_fixed_filters_come_first() {
        let mut s = settings(&["name LIKE ?"]);
        s.fixed_filters = vec![
            FixedFilter::new("tenant_id = ?", vec![json!(7)]),
            FixedFilter::new("deleted_at IS NULL", vec![]),
        ];
        let plan = QueryBuilder::new(&s).build("x", "?").unwrap();

        assert_eq!(
            plan.where_clause(),
            "WHERE tenant_id = ? AND deleted_at IS NULL AND name LIKE ?"
        );
        assert_eq!(plan.bound_params, vec![json!(7), json!("%x%")]);
        assert_eq!(plan.bound_params.len(), placeholder_total(&plan));
    }

    #[test]
    fn test_normalizes_term() {
        let builder = QueryBuilder::new(&settings(&["name LIKE ?"]));
        let plan = builder.build("  a \t  b  ", "?").unwrap();
        assert_eq!(plan.term, "a b");
        assert_eq!(plan.parts, vec!["a", "b"]);
    }

    #[test]
    fn test_validation_pattern_rejects_match() {
        let mut s = settings(&["name LIKE ?"]);
        s.validation_pattern = Some(r"[^\p{L}\p{N}\s]".to_string());
        let builder = QueryBuilder::new(&s);

        assert!(builder.build("José 12", "?").is_ok());
        let err = builder.build("50%; DROP", "?").unwrap_err();
        assert!(matches!(err, AutocompleteError::InvalidCharacters { .. }));
    }

    #[test]
    fn test_malformed_pattern_rejects_every_term() {
        let mut s = settings(&["name LIKE ?"]);
        s.validation_pattern = Some("[unclosed".to_string());
        let err = QueryBuilder::new(&s).build("anything", "?").unwrap_err();
        assert!(matches!(err, AutocompleteError::InvalidPattern { .. }));
    }

    #[test]
    fn test_custom_placeholder() {
        let builder = QueryBuilder::new(&settings(&["name ILIKE :p OR code = :p"]));
        let plan = builder.build("ab", ":p").unwrap();
        assert_eq!(plan.bound_params, vec![json!("%ab%"), json!("%ab%")]);
    }

    #[test]
    fn test_empty_where_clause() {
        assert_eq!(where_clause(&[]), "");
    }
}
