//! Add `defer` to classic external scripts.
//!
//! `<script src="app.js">` becomes `<script defer src="app.js">`. Scripts
//! that already carry `defer` or `async` are not matched, so a second run
//! finds nothing to do.

use super::{Context, Rewrite, RewriteResult};
use crate::markup::{Edit, Markup};

pub struct DeferScripts;

impl Rewrite for DeferScripts {
    fn name(&self) -> &'static str {
        "defer-scripts"
    }

    fn rewrite(&self, text: &str, cx: &mut Context<'_>) -> RewriteResult {
        let doc = Markup::scan(text);
        let edits = cx
            .patterns
            .external_scripts(&doc)
            .into_iter()
            .map(|tag| Edit::insert(tag.name_end(), " defer"))
            .collect();

        RewriteResult::from_edits(text, edits)
    }
}
