//! Whitespace and comment stripping.
//!
//! Line-local and conservative: comments go (conditional comments stay),
//! every line is trimmed and blank lines are dropped. Tag contents are never
//! reflowed, so inline scripts and styles survive intact.

use super::{Context, Rewrite, RewriteResult};
use crate::markup::{Comment, Edit, Markup, apply_edits};

pub struct Minify;

impl Rewrite for Minify {
    fn name(&self) -> &'static str {
        "minify"
    }

    fn rewrite(&self, text: &str, _cx: &mut Context<'_>) -> RewriteResult {
        let text_out = collapse(text);
        let changed = text_out != text;
        RewriteResult {
            text: text_out,
            changed,
        }
    }
}

/// Minified form of `text`.
///
/// Output lines are joined with `\n` and end with a single `\n`; text with no
/// content left collapses to the empty string.
pub fn collapse(text: &str) -> String {
    let doc = Markup::scan(text);
    let edits = doc
        .comments()
        .iter()
        .filter(|c| is_removable(&doc, c))
        .map(|c| Edit::remove(c.span.clone()))
        .collect();
    let stripped = apply_edits(text, edits);

    let mut out = String::with_capacity(stripped.len());
    for line in stripped.lines().map(str::trim).filter(|l| !l.is_empty()) {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Closed, non-conditional comment.
fn is_removable(doc: &Markup<'_>, comment: &Comment) -> bool {
    if !doc.slice(&comment.span).ends_with("-->") {
        return false;
    }
    let body = doc.slice(&comment.body).trim_start();
    !(body.starts_with("[if") || body.starts_with("<![endif]"))
}
