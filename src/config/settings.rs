//! Settings structures for termsuggest configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Main settings structure loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub general: GeneralSettings,
    pub autocomplete: AutocompleteSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (AUTOCOMPLETE_* prefix).
    ///
    /// Returns a message for every variable that was set but ignored. The
    /// caller logs them once logging is set up.
    pub fn merge_env(&mut self) -> Vec<String> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge overrides looked up by variable name
    pub fn merge_vars<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ignored = Vec::new();
        if let Some(val) = lookup("AUTOCOMPLETE_DEBUG") {
            match val.parse() {
                Ok(debug) => self.general.debug = debug,
                Err(_) => ignored.push(format!(
                    "Ignoring AUTOCOMPLETE_DEBUG: expected true or false, got {:?}",
                    val
                )),
            }
        }
        if let Some(val) = lookup("AUTOCOMPLETE_TERM_PARTS_MAX") {
            match val.parse() {
                Ok(max) => self.autocomplete.term_parts_max = max,
                Err(e) => ignored.push(format!("Ignoring AUTOCOMPLETE_TERM_PARTS_MAX: {}", e)),
            }
        }
        if let Some(val) = lookup("AUTOCOMPLETE_HIGHLIGHT") {
            match val.parse() {
                Ok(highlight) => self.autocomplete.highlight_results = highlight,
                Err(_) => ignored.push(format!(
                    "Ignoring AUTOCOMPLETE_HIGHLIGHT: expected true or false, got {:?}",
                    val
                )),
            }
        }
        ignored
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
}

/// Static configuration of one autocomplete list.
///
/// Everything except the term itself: the SQL pieces, how the term is
/// normalized and split, and how results are highlighted. Unknown keys are
/// rejected when deserializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutocompleteSettings {
    /// SELECT part of the query, up to (not including) WHERE
    pub select_sql: String,
    /// WHERE fragment per term part
    pub parts_where_sql: Vec<String>,
    /// Trailing ORDER BY / LIMIT part of the query
    pub order_sql: String,
    /// Strip leading and trailing whitespace from the term
    pub trim_term: bool,
    /// Replace any run of whitespace in the term with one space
    pub collapse_whitespace: bool,
    /// Regex of characters that are not allowed in the term
    pub validation_pattern: Option<String>,
    /// Filters prepended to every query
    pub fixed_filters: Vec<FixedFilter>,
    /// Delimiter used to split the term into parts (none = single part)
    pub term_parts_delimiter: Option<String>,
    /// Maximum number of term parts
    pub term_parts_max: TermPartsMax,
    /// How each part is compared to the text
    pub comparison_operator: ComparisonOperator,
    /// Wrap matched parts of the labels in highlight markup
    pub highlight_results: bool,
    /// CSS class of the highlight span
    pub highlight_class: String,
    /// Ignore accents when highlighting
    pub accent_insensitive: bool,
    /// User facing messages
    pub messages: Messages,
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self {
            select_sql: String::new(),
            parts_where_sql: Vec::new(),
            order_sql: String::new(),
            trim_term: true,
            collapse_whitespace: true,
            validation_pattern: None,
            fixed_filters: Vec::new(),
            term_parts_delimiter: Some(" ".to_string()),
            term_parts_max: TermPartsMax::Any,
            comparison_operator: ComparisonOperator::default(),
            highlight_results: true,
            highlight_class: "bg-primary".to_string(),
            accent_insensitive: true,
            messages: Messages::default(),
        }
    }
}

impl AutocompleteSettings {
    /// Create settings from the three required SQL pieces
    pub fn new(
        select_sql: impl Into<String>,
        parts_where_sql: Vec<String>,
        order_sql: impl Into<String>,
    ) -> Self {
        Self {
            select_sql: select_sql.into(),
            parts_where_sql,
            order_sql: order_sql.into(),
            ..Default::default()
        }
    }

    /// The effective delimiter; an empty string counts as no delimiter
    pub fn delimiter(&self) -> Option<&str> {
        self.term_parts_delimiter
            .as_deref()
            .filter(|d| !d.is_empty())
    }
}

/// A filter applied to every query, e.g. tenant scoping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedFilter {
    /// WHERE fragment
    pub sql: String,
    /// One value per placeholder in `sql`
    #[serde(default)]
    pub params: Vec<serde_json::Value>,
}

impl FixedFilter {
    pub fn new(sql: impl Into<String>, params: Vec<serde_json::Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Maximum number of parts a term is split into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPartsMax", into = "RawPartsMax")]
pub enum TermPartsMax {
    /// Split on every delimiter
    #[default]
    Any,
    /// Split into at most this many parts. Only 2..=99 is usable; other
    /// values are reported on every request.
    Max(i64),
}

impl TermPartsMax {
    /// Smallest usable bound
    pub const MIN: i64 = 2;
    /// Largest usable bound (two digits)
    pub const MAX: i64 = 99;

    /// Whether the value can be used to split a term
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Any => true,
            Self::Max(n) => (Self::MIN..=Self::MAX).contains(&n),
        }
    }
}

impl FromStr for TermPartsMax {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s == "any" {
            return Ok(Self::Any);
        }
        // digits only, at most two of them: no sign, no padding
        let digits_only = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !digits_only || s.len() > 2 {
            return Err(format!(
                "expected \"any\" or a number of at most two digits, got {:?}",
                s
            ));
        }
        s.parse()
            .map(Self::Max)
            .map_err(|_| format!("expected \"any\" or a number, got {:?}", s))
    }
}

impl fmt::Display for TermPartsMax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Max(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawPartsMax {
    Int(i64),
    Text(String),
}

impl TryFrom<RawPartsMax> for TermPartsMax {
    type Error = String;

    fn try_from(raw: RawPartsMax) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawPartsMax::Int(n) => Ok(Self::Max(n)),
            RawPartsMax::Text(s) => s.parse(),
        }
    }
}

impl From<TermPartsMax> for RawPartsMax {
    fn from(max: TermPartsMax) -> Self {
        match max {
            TermPartsMax::Any => Self::Text("any".to_string()),
            TermPartsMax::Max(n) => Self::Int(n),
        }
    }
}

/// How a term part is compared to the searched text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Text contains the part anywhere
    #[default]
    #[serde(rename = "text_contains_term")]
    ContainsTerm,
    /// Text starts with the part
    #[serde(rename = "text_starts_with_term")]
    StartsWithTerm,
}

impl ComparisonOperator {
    /// Wrap an already normalized part in LIKE wildcards
    pub fn pattern(&self, value: &str) -> String {
        match self {
            Self::ContainsTerm => format!("%{}%", value),
            Self::StartsWithTerm => format!("{}%", value),
        }
    }
}

/// Messages returned to the user in place of results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Messages {
    pub invalid_pattern: String,
    pub invalid_characters: String,
    pub invalid_parameter: String,
    pub query_error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            invalid_pattern: "Match pattern is invalid".to_string(),
            invalid_characters: "Term contains invalid characters".to_string(),
            invalid_parameter: "Invalid parameter".to_string(),
            query_error: "Error executing query".to_string(),
        }
    }
}
