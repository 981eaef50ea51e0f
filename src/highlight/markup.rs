//! Highlight markup

/// Markup placed around a highlighted span.
///
/// The highlighter also uses the open and close tokens to recognise text it
/// has already wrapped, so the tokens must be non-empty for repeated passes
/// to leave existing highlights alone.
///
/// Recognition is purely textual. A label that itself contains the tokens is
/// treated as already highlighted between them: with `TagPair::new("[", "]")`
/// the `bar` in `"Foo [bar] baz"` is never matched. Pick tokens that cannot
/// occur in labels, as the default `<span class="...">` markup does for
/// escaped text.
pub trait HighlightMarkup: Send + Sync {
    /// Token written before the highlighted text
    fn open(&self) -> &str;

    /// Token written after the highlighted text
    fn close(&self) -> &str;

    /// Wrap `text` in the markup
    fn wrap(&self, text: &str) -> String {
        let mut out = String::with_capacity(self.open().len() + text.len() + self.close().len());
        out.push_str(self.open());
        out.push_str(text);
        out.push_str(self.close());
        out
    }
}

/// `<span class="...">text</span>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanClass {
    open: String,
}

impl SpanClass {
    pub fn new(class: &str) -> Self {
        Self {
            open: format!("<span class=\"{}\">", class),
        }
    }
}

impl Default for SpanClass {
    fn default() -> Self {
        Self::new("bg-primary")
    }
}

impl HighlightMarkup for SpanClass {
    fn open(&self) -> &str {
        &self.open
    }

    fn close(&self) -> &str {
        "</span>"
    }
}

/// Arbitrary pre/post tags, e.g. `<em>` and `</em>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    pub pre_tag: String,
    pub post_tag: String,
}

impl TagPair {
    pub fn new(pre_tag: impl Into<String>, post_tag: impl Into<String>) -> Self {
        Self {
            pre_tag: pre_tag.into(),
            post_tag: post_tag.into(),
        }
    }
}

impl HighlightMarkup for TagPair {
    fn open(&self) -> &str {
        &self.pre_tag
    }

    fn close(&self) -> &str {
        &self.post_tag
    }
}
