//! Term normalization and splitting

use once_cell::sync::Lazy;
use regex::Regex;

use crate::accents::fold_accents;
use crate::config::ComparisonOperator;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Trim and collapse whitespace in a raw term
pub fn normalize(term: &str, trim: bool, collapse_whitespace: bool) -> String {
    let term = if trim { term.trim() } else { term };
    if collapse_whitespace {
        WHITESPACE_RUN.replace_all(term, " ").into_owned()
    } else {
        term.to_string()
    }
}

/// Split a term into parts.
///
/// Without a delimiter the whole term is one part. With a limit the last
/// part keeps any remaining delimiters.
pub fn split<'a>(term: &'a str, delimiter: Option<&str>, limit: Option<usize>) -> Vec<&'a str> {
    match (delimiter, limit) {
        (None, _) => vec![term],
        (Some(delimiter), None) => term.split(delimiter).collect(),
        (Some(delimiter), Some(limit)) => term.splitn(limit, delimiter).collect(),
    }
}

/// Value bound for one term part: lowercased, accent folded and wrapped in
/// LIKE wildcards.
pub fn bind_value(part: &str, operator: ComparisonOperator) -> String {
    operator.pattern(&fold_accents(&part.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  rust   lang \t", true, true), "rust lang");
        assert_eq!(normalize("  rust   lang ", true, false), "rust   lang");
        assert_eq!(normalize("  rust   lang ", false, true), " rust lang ");
        assert_eq!(normalize("a\n\nb", false, false), "a\n\nb");
    }

    #[test]
    fn test_split_unbounded_matches_full_split() {
        for term in ["a b", "a b c d", "single", "", "a  b", " lead"] {
            let expected: Vec<&str> = term.split(' ').collect();
            assert_eq!(split(term, Some(" "), None), expected);
        }
    }

    #[test]
    fn test_split_bounded_keeps_rest() {
        assert_eq!(split("a b c d", Some(" "), Some(2)), vec!["a", "b c d"]);
        assert_eq!(split("a b c d", Some(" "), Some(3)), vec!["a", "b", "c d"]);
        assert_eq!(split("a b", Some(" "), Some(5)), vec!["a", "b"]);
        assert_eq!(split("a", Some(" "), Some(2)), vec!["a"]);
    }

    #[test]
    fn test_split_without_delimiter() {
        assert_eq!(split("a b c", None, None), vec!["a b c"]);
        assert_eq!(split("a b c", None, Some(2)), vec!["a b c"]);
    }

    #[test]
    fn test_split_multichar_delimiter() {
        assert_eq!(split("smith, john", Some(", "), None), vec!["smith", "john"]);
    }

    #[test]
    fn test_bind_value() {
        assert_eq!(bind_value("Café", ComparisonOperator::ContainsTerm), "%cafe%");
        assert_eq!(bind_value("ÉCOLE", ComparisonOperator::StartsWithTerm), "ecole%");
    }
}
