//! Load font and icon stylesheets without blocking render.
//!
//! ```html
//! <link href="https://fonts.googleapis.com/css?family=Inter" rel="stylesheet">
//! ```
//! becomes
//! ```html
//! <link href="https://fonts.googleapis.com/css?family=Inter&display=swap" rel="stylesheet" media="print" onload="this.media='all'"><noscript><link href="https://fonts.googleapis.com/css?family=Inter&display=swap" rel="stylesheet"></noscript>
//! ```
//!
//! Links that already have a `media` attribute are skipped, which covers
//! links rewritten by an earlier run.

use super::{Context, Rewrite, RewriteResult};
use crate::markup::{Edit, Markup, Span, Tag, apply_edits};

const NAME: &str = "async-fonts";

/// Inserted right after the `rel` attribute.
const PRINT_MEDIA: &str = r#" media="print" onload="this.media='all'""#;

/// Google Fonts CSS API (`/css` and `/css2`).
const GOOGLE_FONTS_CSS: &str = "fonts.googleapis.com/css";

pub struct AsyncFonts;

impl Rewrite for AsyncFonts {
    fn name(&self) -> &'static str {
        NAME
    }

    fn rewrite(&self, text: &str, cx: &mut Context<'_>) -> RewriteResult {
        let doc = Markup::scan(text);
        let edits = cx
            .patterns
            .font_links(&doc)
            .into_iter()
            .filter(|tag| !tag.has_attr("media"))
            .filter_map(|tag| asyncify(&doc, tag))
            .collect();

        RewriteResult::from_edits(text, edits)
    }
}

/// Replacement for one link: the hacked tag followed by its fallback.
fn asyncify(doc: &Markup<'_>, tag: &Tag) -> Option<Edit> {
    let rel = tag.attr("rel")?;
    let base = tag.span.start;
    let local = |span: &Span| span.start - base..span.end - base;
    let original = doc.slice(&tag.span);

    let mut href_edit = Vec::new();
    if let Some(href) = tag.attr("href")
        && let Some(value) = &href.value
        && let Some(swapped) = with_display_swap(doc.slice(value))
    {
        href_edit.push(Edit::replace(local(value), swapped));
    }

    let fallback = apply_edits(original, href_edit.clone());

    let mut edits = href_edit;
    edits.push(Edit::insert(rel.span.end - base, PRINT_MEDIA));
    let hacked = apply_edits(original, edits);

    Some(Edit::replace(
        tag.span.clone(),
        format!("{hacked}<noscript>{fallback}</noscript>"),
    ))
}

/// Append `display=swap` to a Google Fonts CSS href lacking `display=`.
fn with_display_swap(href: &str) -> Option<String> {
    let lower = href.to_ascii_lowercase();
    if !lower.contains(GOOGLE_FONTS_CSS) || lower.contains("display=") {
        return None;
    }
    let separator = if href.contains('?') { '&' } else { '?' };
    Some(format!("{href}{separator}display=swap"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::testing::{assert_idempotent, run};

    #[test]
    fn test_google_fonts_link() {
        let text = r#"<link href="https://fonts.googleapis.com/css?family=Inter" rel="stylesheet">"#;
        let (result, issues) = run(&AsyncFonts, text);
        assert!(result.changed);
        assert!(issues.is_empty());
        assert_eq!(
            result.text,
            concat!(
                r#"<link href="https://fonts.googleapis.com/css?family=Inter&display=swap" rel="stylesheet" media="print" onload="this.media='all'">"#,
                r#"<noscript><link href="https://fonts.googleapis.com/css?family=Inter&display=swap" rel="stylesheet"></noscript>"#,
            )
        );
    }

    #[test]
    fn test_idempotent() {
        let text = "<head>\n<link rel='stylesheet' href='https://fonts.googleapis.com/css2?family=Lora'>\n</head>";
        let out = assert_idempotent(&AsyncFonts, text);
        assert_eq!(out.matches("<noscript>").count(), 1);
        assert_eq!(out.matches("display=swap").count(), 2);
    }

    #[test]
    fn test_existing_display_kept() {
        let text = r#"<link rel="stylesheet" href="https://fonts.googleapis.com/css2?family=Inter&display=optional">"#;
        let (result, _) = run(&AsyncFonts, text);
        assert!(!result.text.contains("display=swap"));
        assert!(result.text.contains(r#"rel="stylesheet" media="print""#));
    }

    #[test]
    fn test_icon_font_without_query() {
        let text = r#"<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css" />"#;
        let (result, _) = run(&AsyncFonts, text);
        assert_eq!(
            result.text,
            concat!(
                r#"<link rel="stylesheet" media="print" onload="this.media='all'" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css" />"#,
                r#"<noscript><link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css" /></noscript>"#,
            )
        );
    }

    #[test]
    fn test_media_links_untouched() {
        let text = r#"<link rel="stylesheet" media="screen" href="https://fonts.googleapis.com/css?family=Inter">"#;
        let (result, _) = run(&AsyncFonts, text);
        assert!(!result.changed);
    }

    #[test]
    fn test_other_stylesheets_untouched() {
        let text = r#"<link rel="stylesheet" href="assets/site.css"><link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>"#;
        let (result, _) = run(&AsyncFonts, text);
        assert!(!result.changed);
    }

    #[test]
    fn test_display_swap_separator() {
        assert_eq!(
            with_display_swap("https://fonts.googleapis.com/css2").as_deref(),
            Some("https://fonts.googleapis.com/css2?display=swap")
        );
        assert_eq!(with_display_swap("https://fonts.bunny.net/css?family=a"), None);
    }
}
