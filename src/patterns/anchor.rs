//! Insertion anchors.

use std::fmt;

use thiserror::Error;

use crate::markup::{Markup, Span, Tag};

/// A head/body boundary used as an insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    HeadOpen,
    HeadClose,
    BodyOpen,
}

impl Anchor {
    const fn tag(self) -> &'static str {
        match self {
            Self::HeadOpen | Self::HeadClose => "head",
            Self::BodyOpen => "body",
        }
    }

    const fn is_closing(self) -> bool {
        matches!(self, Self::HeadClose)
    }

    fn occurrences<'d>(self, doc: &'d Markup<'_>) -> Vec<&'d Tag> {
        doc.tags()
            .iter()
            .filter(|t| t.closing == self.is_closing() && t.name == self.tag() && !t.in_noscript)
            .collect()
    }

    /// Locate the anchor, which must appear exactly once.
    pub fn locate(self, doc: &Markup<'_>) -> Result<Span, AnchorError> {
        let mut found = self.occurrences(doc);
        match found.len() {
            0 => Err(AnchorError::Missing(self)),
            1 => Ok(found.remove(0).span.clone()),
            n => Err(AnchorError::Duplicated(self, n)),
        }
    }

    /// First occurrence, tolerating duplicates.
    pub fn first(self, doc: &Markup<'_>) -> Option<Span> {
        self.occurrences(doc).first().map(|t| t.span.clone())
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slash = if self.is_closing() { "/" } else { "" };
        write!(f, "`<{}{}>`", slash, self.tag())
    }
}

/// Why an anchor could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnchorError {
    #[error("{0} not found")]
    Missing(Anchor),

    #[error("{0} appears {1} times")]
    Duplicated(Anchor, usize),
}
