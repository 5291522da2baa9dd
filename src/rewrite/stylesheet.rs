//! Insert the precompiled stylesheet.
//!
//! Every block written by an earlier run, inline or linked, is removed
//! together with the line break right after it. Then exactly one fresh block
//! and a line break go immediately before `</head>`. Removing the block a
//! run inserted restores the text it was inserted into, so the step is
//! idempotent.

use std::sync::Arc;

use super::{Context, Issue, Rewrite, RewriteResult};
use crate::artifact::StylesheetArtifact;
use crate::markup::{Edit, Markup, Span};
use crate::patterns::Anchor;

const NAME: &str = "inject-stylesheet";

pub struct InjectStylesheet {
    artifact: Arc<StylesheetArtifact>,
}

impl InjectStylesheet {
    pub fn new(artifact: Arc<StylesheetArtifact>) -> Self {
        Self { artifact }
    }
}

impl Rewrite for InjectStylesheet {
    fn name(&self) -> &'static str {
        NAME
    }

    fn rewrite(&self, text: &str, cx: &mut Context<'_>) -> RewriteResult {
        let doc = Markup::scan(text);
        let patterns = cx.patterns;
        let mut edits = Vec::new();

        for tag in patterns.injected_inline(&doc) {
            if tag.is_terminated() {
                edits.push(Edit::remove(with_line_break(text, tag.outer())));
            } else {
                cx.issue(Issue::ambiguity(NAME, "inline stylesheet without `</style>` left in place"));
            }
        }
        for tag in patterns.injected_linked(&doc, cx.path) {
            edits.push(Edit::remove(with_line_break(text, tag.span.clone())));
        }

        match Anchor::HeadClose.locate(&doc) {
            Ok(head_close) => {
                let block = self.artifact.block_for(cx.path);
                edits.push(Edit::insert(head_close.start, format!("{block}\n")));
            }
            Err(err) => cx.issue(Issue::from_anchor(NAME, err)),
        }

        RewriteResult::from_edits(text, edits)
    }
}

/// Extend `span` over one directly following `\n` or `\r\n`.
fn with_line_break(text: &str, span: Span) -> Span {
    let rest = &text[span.end..];
    let extra = if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with('\n') {
        1
    } else {
        0
    };
    span.start..span.end + extra
}
