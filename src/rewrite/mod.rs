//! Rewrite steps.
//!
//! Each step takes the whole document text and returns new text plus a
//! changed flag. Steps re-scan the text they are given, so anchors are always
//! located fresh. Problems are recorded as [`Issue`]s on the [`Context`];
//! a step never fails.
//!
//! | Step                   | Name                | Effect                                   |
//! |------------------------|---------------------|------------------------------------------|
//! | [`StripFramework`]     | `strip-framework`   | remove runtime script, config, stale hints |
//! | [`AsyncFonts`]         | `async-fonts`       | print-media hack + `<noscript>` fallback |
//! | [`DeferScripts`]       | `defer-scripts`     | add `defer` to classic external scripts  |
//! | [`InjectStylesheet`]   | `inject-stylesheet` | replace earlier blocks with one fresh one |
//! | [`InjectPreconnect`]   | `preconnect`        | hint media hosts near the top of body    |
//! | [`Minify`]             | `minify`            | strip comments and blank lines           |

mod defer;
mod fonts;
mod minify;
mod preconnect;
mod strip;
mod stylesheet;

pub use defer::DeferScripts;
pub use fonts::AsyncFonts;
pub use minify::{Minify, collapse};
pub use preconnect::InjectPreconnect;
pub use strip::StripFramework;
pub use stylesheet::InjectStylesheet;

use std::path::Path;

use thiserror::Error;

use crate::markup::{Edit, apply_edits};
use crate::patterns::{Anchor, AnchorError, PatternLibrary};

// ============================================================================
// Issues
// ============================================================================

/// A non-fatal problem found by a step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Issue {
    /// An insertion point is absent; the step skipped its insertion.
    #[error("{step}: {anchor} not found, nothing inserted")]
    AnchorMissing { step: &'static str, anchor: Anchor },

    /// A match could not be resolved safely; the occurrence was left as is.
    #[error("{step}: {detail}")]
    MatchAmbiguity { step: &'static str, detail: String },
}

impl Issue {
    pub fn ambiguity(step: &'static str, detail: impl Into<String>) -> Self {
        Self::MatchAmbiguity {
            step,
            detail: detail.into(),
        }
    }

    /// Map a failed anchor lookup. Duplicated anchors count as ambiguous.
    pub fn from_anchor(step: &'static str, err: AnchorError) -> Self {
        match err {
            AnchorError::Missing(anchor) => Self::AnchorMissing { step, anchor },
            AnchorError::Duplicated(..) => Self::ambiguity(step, format!("{err}, nothing inserted")),
        }
    }
}

// ============================================================================
// Step interface
// ============================================================================

/// Output of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub text: String,
    /// `text` differs from the input.
    pub changed: bool,
}

impl RewriteResult {
    pub fn unchanged(input: &str) -> Self {
        Self {
            text: input.to_string(),
            changed: false,
        }
    }

    /// Apply `edits` to `input`.
    pub fn from_edits(input: &str, edits: Vec<Edit>) -> Self {
        if edits.is_empty() {
            return Self::unchanged(input);
        }
        let text = apply_edits(input, edits);
        let changed = text != input;
        Self { text, changed }
    }
}

/// Per-document state handed to every step.
#[derive(Debug)]
pub struct Context<'a> {
    pub patterns: &'a PatternLibrary,
    /// Document path, used for relative hrefs.
    pub path: &'a Path,
    pub issues: Vec<Issue>,
}

impl<'a> Context<'a> {
    pub fn new(patterns: &'a PatternLibrary, path: &'a Path) -> Self {
        Self {
            patterns,
            path,
            issues: Vec::new(),
        }
    }

    pub fn issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }
}

/// One transformation over a document's text.
pub trait Rewrite: Send + Sync {
    /// Short kebab-case name used in reports.
    fn name(&self) -> &'static str;

    fn rewrite(&self, text: &str, cx: &mut Context<'_>) -> RewriteResult;
}

// ============================================================================
// Test helpers
// ============================================================================
