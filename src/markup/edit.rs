//! Span-based text edits.

use super::Span;

/// Replace `span` with `replacement`. An empty span is an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Span,
    pub replacement: String,
}

impl Edit {
    pub fn remove(span: Span) -> Self {
        Self {
            span,
            replacement: String::new(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            span: at..at,
            replacement: text.into(),
        }
    }

    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            replacement: text.into(),
        }
    }
}

/// Apply edits to `text` in one pass.
///
/// Edits are ordered by position; insertions at the same offset keep their
/// order. An edit overlapping an earlier one is dropped.
pub fn apply_edits(text: &str, mut edits: Vec<Edit>) -> String {
    if edits.is_empty() {
        return text.to_string();
    }
    edits.sort_by_key(|e| (e.span.start, e.span.end));

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for edit in edits {
        if edit.span.start < cursor {
            continue;
        }
        out.push_str(&text[cursor..edit.span.start]);
        out.push_str(&edit.replacement);
        cursor = edit.span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Grow `span` to its whole line when nothing but blanks share that line.
///
/// The grown span includes the line break, so removing it leaves no empty
/// line behind. Otherwise `span` is returned unchanged.
pub fn line_extent(text: &str, span: Span) -> Span {
    let bytes = text.as_bytes();

    let mut start = span.start;
    while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
        start -= 1;
    }
    if start > 0 && bytes[start - 1] != b'\n' {
        return span;
    }

    let mut end = span.end;
    while end < bytes.len() && matches!(bytes[end], b' ' | b'\t' | b'\r') {
        end += 1;
    }
    match bytes.get(end) {
        Some(b'\n') => start..end + 1,
        None => start..end,
        Some(_) => span,
    }
}
