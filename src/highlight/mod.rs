//! Result highlighting
//!
//! Wraps every occurrence of the term parts in a row's label with highlight
//! markup. Matching ignores case and, by default, accents. When matches of
//! different parts overlap, the one found first wins: parts are searched in
//! their configured order and occurrences left to right.

mod markup;

pub use markup::{HighlightMarkup, SpanClass, TagPair};

use crate::accents::fold_char;
use crate::results::ResultRow;

/// A highlighted region of a label, in characters of the original label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub length: usize,
}

impl MatchSpan {
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    fn overlaps(&self, other: &MatchSpan) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// Label prepared for matching: folded, lowercased characters and, for each
/// of them, the index of the original character it came from.
struct FoldedText {
    chars: Vec<char>,
    origin: Vec<usize>,
}

impl FoldedText {
    fn new(text: &str, fold_accents: bool) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len());
        for (index, c) in text.chars().enumerate() {
            for folded in fold(c, fold_accents) {
                chars.push(folded);
                origin.push(index);
            }
        }
        Self { chars, origin }
    }

    /// Map a match on the folded characters back to the original label
    fn span(&self, start: usize, len: usize) -> MatchSpan {
        let first = self.origin[start];
        let last = self.origin[start + len - 1];
        MatchSpan {
            start: first,
            length: last + 1 - first,
        }
    }
}

fn fold(c: char, fold_accents: bool) -> impl Iterator<Item = char> {
    let folded: Box<dyn Iterator<Item = char>> = if fold_accents {
        Box::new(fold_char(c))
    } else {
        Box::new(std::iter::once(c))
    };
    folded.flat_map(char::to_lowercase)
}

fn fold_part(part: &str, fold_accents: bool) -> Vec<char> {
    part.chars().flat_map(|c| fold(c, fold_accents)).collect()
}

/// Start offsets of every non-overlapping occurrence of `needle`
fn find_all(haystack: &[char], needle: &[char]) -> Vec<usize> {
    let mut found = Vec::new();
    if needle.is_empty() || needle.len() > haystack.len() {
        return found;
    }
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if haystack[i..i + needle.len()] == *needle {
            found.push(i);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    found
}

/// Highlights term parts in result labels
pub struct Highlighter {
    markup: Box<dyn HighlightMarkup>,
    accent_insensitive: bool,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(SpanClass::default())
    }
}

impl Highlighter {
    /// Create an accent-insensitive highlighter using `markup`
    pub fn new(markup: impl HighlightMarkup + 'static) -> Self {
        Self {
            markup: Box::new(markup),
            accent_insensitive: true,
        }
    }

    /// Whether accents are ignored when matching
    pub fn accent_insensitive(mut self, enabled: bool) -> Self {
        self.accent_insensitive = enabled;
        self
    }

    pub fn is_accent_insensitive(&self) -> bool {
        self.accent_insensitive
    }

    /// Rewrite the label of every row. Rows without a match, and every
    /// field other than `label`, are left as they are.
    pub fn apply<S: AsRef<str>>(&self, rows: &mut [ResultRow], parts: &[S]) {
        let parts = self.prepare_parts(parts);
        if parts.is_empty() {
            return;
        }

        for row in rows.iter_mut() {
            if let Some(label) = self.highlight_folded(&row.label, &parts) {
                row.label = label;
            }
        }
    }

    /// Highlight a single label. Returns `None` when nothing matched.
    pub fn highlight<S: AsRef<str>>(&self, label: &str, parts: &[S]) -> Option<String> {
        let parts = self.prepare_parts(parts);
        self.highlight_folded(label, &parts)
    }

    /// Accepted spans for a label, sorted by offset
    pub fn spans<S: AsRef<str>>(&self, label: &str, parts: &[S]) -> Vec<MatchSpan> {
        let parts = self.prepare_parts(parts);
        self.resolve_spans(label, &parts)
    }

    fn prepare_parts<S: AsRef<str>>(&self, parts: &[S]) -> Vec<Vec<char>> {
        parts
            .iter()
            .map(|p| fold_part(p.as_ref(), self.accent_insensitive))
            .filter(|p| !p.is_empty())
            .collect()
    }

    fn highlight_folded(&self, label: &str, parts: &[Vec<char>]) -> Option<String> {
        let spans = self.resolve_spans(label, parts);
        if spans.is_empty() {
            return None;
        }
        Some(self.render(label, &spans))
    }

    /// Parts are tried in order and every occurrence is a candidate. A
    /// candidate is dropped when it overlaps any span accepted before it or
    /// any already marked region, not only when it starts inside one. So
    /// `"xabc"` with parts `["abc", "xa"]` yields `x[abc]`: `xa` starts before
    /// `abc` but runs into it, and accepting it would render the `a` twice.
    fn resolve_spans(&self, label: &str, parts: &[Vec<char>]) -> Vec<MatchSpan> {
        let text = FoldedText::new(label, self.accent_insensitive);
        let marked = self.marked_regions(label);
        let mut accepted: Vec<MatchSpan> = Vec::new();

        for part in parts {
            for start in find_all(&text.chars, part) {
                let candidate = text.span(start, part.len());
                let taken = marked
                    .iter()
                    .chain(accepted.iter())
                    .any(|span| span.overlaps(&candidate));
                if !taken {
                    accepted.push(candidate);
                }
            }
        }

        accepted.sort_by_key(|span| span.start);
        accepted
    }

    /// Regions already wrapped in this highlighter's markup, tokens included.
    /// Literal label text between the tokens counts too.
    fn marked_regions(&self, label: &str) -> Vec<MatchSpan> {
        let (open, close) = (self.markup.open(), self.markup.close());
        let mut regions = Vec::new();
        if open.is_empty() || close.is_empty() {
            return regions;
        }

        let mut from = 0;
        while let Some(rel) = label[from..].find(open) {
            let start = from + rel;
            let Some(close_rel) = label[start + open.len()..].find(close) else {
                break;
            };
            let end = start + open.len() + close_rel + close.len();
            let start_char = label[..start].chars().count();
            regions.push(MatchSpan {
                start: start_char,
                length: label[start..end].chars().count(),
            });
            from = end;
        }
        regions
    }

    fn render(&self, label: &str, spans: &[MatchSpan]) -> String {
        let chars: Vec<char> = label.chars().collect();
        let mut out = String::with_capacity(label.len() + spans.len() * 32);
        let mut cursor = 0;

        for span in spans {
            if span.start > cursor {
                out.extend(&chars[cursor..span.start]);
            }
            let text: String = chars[span.start..span.end()].iter().collect();
            out.push_str(&self.markup.wrap(&text));
            cursor = span.end();
        }
        if cursor < chars.len() {
            out.extend(&chars[cursor..]);
        }
        out
    }
}
