//! Tolerant tag scanner.
//!
//! Splits a document into tags and comments with byte spans pointing back into
//! the original text. Steps never rebuild a document from tokens; they splice
//! the original string at these spans, so everything the scanner does not
//! understand passes through byte-for-byte.
//!
//! What the scanner knows about HTML:
//!
//! - comments (`<!-- ... -->`) are opaque and never scanned for tags
//! - `<!DOCTYPE>`, `<![CDATA[`, `<?...?>` are skipped
//! - raw text elements (`script`, `style`, `textarea`, `title`) swallow
//!   everything up to their closing tag
//! - tags nested in `<noscript>` are flagged, so fallbacks written by one run
//!   are not rewritten again by the next
//!
//! A tag cut off by the end of input stops the scan; nothing after it is
//! reported.

mod edit;

pub use edit::{Edit, apply_edits, line_extent};

use std::ops::Range;

use crate::utils::html::is_raw_text_element;

/// Byte range into the scanned text.
pub type Span = Range<usize>;

/// One attribute of a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Lowercased attribute name.
    pub name: String,
    /// Whole attribute, `name="value"` including quotes.
    pub span: Span,
    /// Value without quotes, if the attribute has one.
    pub value: Option<Span>,
}

/// Body and closing tag of a raw text element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText {
    pub content: Span,
    /// `None` when the element runs to the end of input.
    pub close: Option<Span>,
}

/// An opening or closing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased tag name.
    pub name: String,
    /// `<name ...>` or `</name>`.
    pub span: Span,
    pub closing: bool,
    pub attrs: Vec<Attr>,
    pub raw: Option<RawText>,
    pub in_noscript: bool,
}

impl Tag {
    /// Find an attribute by lowercase name.
    pub fn attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name == name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Span of the whole element: through the closing tag for raw text
    /// elements, the tag itself otherwise.
    pub fn outer(&self) -> Span {
        match &self.raw {
            Some(RawText {
                close: Some(close), ..
            }) => self.span.start..close.end,
            Some(RawText { content, .. }) => self.span.start..content.end,
            None => self.span.clone(),
        }
    }

    /// Raw text element with a closing tag.
    pub fn is_terminated(&self) -> bool {
        self.raw.as_ref().is_some_and(|r| r.close.is_some())
    }

    /// Offset just past the tag name, where new attributes can be inserted.
    pub fn name_end(&self) -> usize {
        self.span.start + 1 + usize::from(self.closing) + self.name.len()
    }
}

/// A comment, `<!--` through `-->`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub span: Span,
    pub body: Span,
}

/// Scanned view of a document.
#[derive(Debug)]
pub struct Markup<'a> {
    text: &'a str,
    tags: Vec<Tag>,
    comments: Vec<Comment>,
}

impl<'a> Markup<'a> {
    /// Scan `text` into tags and comments.
    pub fn scan(text: &'a str) -> Self {
        let bytes = text.as_bytes();
        let mut tags = Vec::new();
        let mut comments = Vec::new();
        let mut noscript_depth = 0usize;
        let mut pos = 0;

        while let Some(offset) = text[pos..].find('<') {
            let start = pos + offset;
            let rest = &bytes[start..];

            if rest.starts_with(b"<!--") {
                let body_start = start + 4;
                // `<!-->` and `<!--->` close immediately.
                let abrupt = [b">".as_slice(), b"->".as_slice()]
                    .into_iter()
                    .find(|close| bytes[body_start..].starts_with(*close));
                let (body_end, end) = match (abrupt, text[body_start..].find("-->")) {
                    (Some(close), _) => (body_start, body_start + close.len()),
                    (None, Some(i)) => (body_start + i, body_start + i + 3),
                    (None, None) => (text.len(), text.len()),
                };
                comments.push(Comment {
                    span: start..end,
                    body: body_start..body_end,
                });
                pos = end;
                continue;
            }

            if rest.starts_with(b"<!") || rest.starts_with(b"<?") {
                pos = text[start..].find('>').map_or(text.len(), |i| start + i + 1);
                continue;
            }

            let closing = rest.get(1) == Some(&b'/');
            let name_start = start + 1 + usize::from(closing);
            let name_len = bytes[name_start..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b':'))
                .count();
            if name_len == 0 || !bytes[name_start].is_ascii_alphabetic() {
                pos = start + 1;
                continue;
            }

            let name = text[name_start..name_start + name_len].to_ascii_lowercase();
            let Some((attrs, end)) = parse_attrs(text, name_start + name_len) else {
                break;
            };

            if closing {
                if name == "noscript" {
                    noscript_depth = noscript_depth.saturating_sub(1);
                }
                tags.push(Tag {
                    name,
                    span: start..end,
                    closing: true,
                    attrs: Vec::new(),
                    raw: None,
                    in_noscript: noscript_depth > 0,
                });
                pos = end;
                continue;
            }

            let in_noscript = noscript_depth > 0;
            if name == "noscript" && !text[..end].ends_with("/>") {
                noscript_depth += 1;
            }

            let raw = is_raw_text_element(&name).then(|| find_raw_close(text, &name, end));
            pos = match &raw {
                Some(RawText {
                    close: Some(close), ..
                }) => close.end,
                Some(_) => text.len(),
                None => end,
            };

            tags.push(Tag {
                name,
                span: start..end,
                closing: false,
                attrs,
                raw,
                in_noscript,
            });
        }

        Self {
            text,
            tags,
            comments,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Opening tags with the given lowercase name.
    pub fn opening<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Tag> + 's {
        self.tags
            .iter()
            .filter(move |t| !t.closing && t.name == name)
    }

    /// Closing tags with the given lowercase name.
    pub fn closing<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Tag> + 's {
        self.tags.iter().filter(move |t| t.closing && t.name == name)
    }

    /// Text of a span.
    pub fn slice(&self, span: &Span) -> &'a str {
        &self.text[span.clone()]
    }

    /// Value of an attribute on `tag`, without quotes.
    pub fn value(&self, tag: &Tag, name: &str) -> Option<&'a str> {
        let span = tag.attr(name)?.value.clone()?;
        Some(&self.text[span])
    }

    /// Whitespace-separated tokens of an attribute contain `token` (ASCII case-insensitive).
    pub fn has_token(&self, tag: &Tag, name: &str, token: &str) -> bool {
        self.value(tag, name).is_some_and(|v| {
            v.split_ascii_whitespace()
                .any(|t| t.eq_ignore_ascii_case(token))
        })
    }
}

/// Parse attributes starting right after the tag name.
///
/// Returns the attributes and the offset just past `>`, or `None` when the
/// input ends inside the tag.
fn parse_attrs(text: &str, from: usize) -> Option<(Vec<Attr>, usize)> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut attrs = Vec::new();
    let mut i = from;

    loop {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            return None;
        }
        match bytes[i] {
            b'>' => return Some((attrs, i + 1)),
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        // Read attribute name
        let name_start = i;
        while i < len
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>')
            && !(bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'>'))
        {
            i += 1;
        }
        if i == name_start {
            // stray '='
            i += 1;
            continue;
        }
        let name = text[name_start..i].to_ascii_lowercase();

        // Look past whitespace for '='
        let mut j = i;
        while j < len && bytes[j].is_ascii_whitespace() {
            j += 1;
        }

        let mut value = None;
        if j < len && bytes[j] == b'=' {
            j += 1;
            while j < len && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j >= len {
                return None;
            }
            match bytes[j] {
                quote @ (b'"' | b'\'') => {
                    let value_start = j + 1;
                    let value_len = text[value_start..].find(char::from(quote))?;
                    value = Some(value_start..value_start + value_len);
                    i = value_start + value_len + 1;
                }
                _ => {
                    let value_start = j;
                    while j < len && !bytes[j].is_ascii_whitespace() && bytes[j] != b'>' {
                        j += 1;
                    }
                    value = Some(value_start..j);
                    i = j;
                }
            }
        }

        attrs.push(Attr {
            name,
            span: name_start..i,
            value,
        });
    }
}

/// Find `</name` (any case) at or after `from`.
fn find_raw_close(text: &str, name: &str, from: usize) -> RawText {
    let bytes = text.as_bytes();

    for (i, _) in text[from..].match_indices("</") {
        let start = from + i;
        let name_start = start + 2;
        let name_end = name_start + name.len();
        let Some(candidate) = bytes.get(name_start..name_end) else {
            break;
        };
        if !candidate.eq_ignore_ascii_case(name.as_bytes()) {
            continue;
        }
        let boundary = bytes
            .get(name_end)
            .is_none_or(|b| b.is_ascii_whitespace() || matches!(b, b'>' | b'/'));
        if !boundary {
            continue;
        }
        let end = text[name_end..]
            .find('>')
            .map_or(text.len(), |j| name_end + j + 1);
        return RawText {
            content: from..start,
            close: Some(start..end),
        };
    }

    RawText {
        content: from..text.len(),
        close: None,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_attributes_any_quoting() {
        let text = r#"<link REL=stylesheet href='a.css' data-x="1 > 2" disabled>"#;
        let doc = Markup::scan(text);
        let tag = &doc.tags()[0];

        assert_eq!(tag.name, "link");
        assert_eq!(tag.span, 0..text.len());
        assert_eq!(doc.value(tag, "rel"), Some("stylesheet"));
        assert_eq!(doc.value(tag, "href"), Some("a.css"));
        assert_eq!(doc.value(tag, "data-x"), Some("1 > 2"));
        assert!(tag.has_attr("disabled"));
        assert_eq!(doc.value(tag, "disabled"), None);
    }

    #[test]
    fn test_attribute_spans_cover_quotes() {
        let text = r#"<script src="app.js" defer></script>"#;
        let doc = Markup::scan(text);
        let src = doc.tags()[0].attr("src").unwrap();
        assert_eq!(&text[src.span.clone()], r#"src="app.js""#);
    }

    #[test]
    fn test_raw_text_hides_markup() {
        let text = "<script>var s = '<link rel=\"stylesheet\">';</script><p>";
        let doc = Markup::scan(text);
        let names: Vec<_> = doc.tags().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["script", "p"]);

        let script = &doc.tags()[0];
        assert!(script.is_terminated());
        assert_eq!(script.outer(), 0..text.len() - 3);
    }

    #[test]
    fn test_raw_close_is_case_insensitive() {
        let text = "<STYLE>a{}</Style >b";
        let doc = Markup::scan(text);
        let style = &doc.tags()[0];
        assert_eq!(style.name, "style");
        assert_eq!(doc.slice(&style.outer()), "<STYLE>a{}</Style >");
    }

    #[test]
    fn test_raw_close_needs_name_boundary() {
        let text = "<script>a</scripts></script>";
        let doc = Markup::scan(text);
        assert_eq!(doc.tags()[0].outer(), 0..text.len());
    }

    #[test]
    fn test_unterminated_raw_text() {
        let doc = Markup::scan("<script>forever");
        let script = &doc.tags()[0];
        assert!(!script.is_terminated());
        assert_eq!(script.outer(), 0..15);
    }

    #[test]
    fn test_comments_are_opaque() {
        let text = "<!-- <script src=x></script> --><b>";
        let doc = Markup::scan(text);
        assert_eq!(doc.comments().len(), 1);
        assert_eq!(doc.slice(&doc.comments()[0].body), " <script src=x></script> ");
        assert_eq!(doc.tags().len(), 1);
        assert_eq!(doc.tags()[0].name, "b");
    }

    #[test]
    fn test_abruptly_closed_empty_comments() {
        let text = "<!--><p>a</p><!---><p>b</p><!---->";
        let doc = Markup::scan(text);

        let spans: Vec<_> = doc.comments().iter().map(|c| doc.slice(&c.span)).collect();
        assert_eq!(spans, vec!["<!-->", "<!--->", "<!---->"]);
        assert!(doc.comments().iter().all(|c| c.body.is_empty()));
        assert_eq!(doc.opening("p").count(), 2);
    }

    #[test]
    fn test_noscript_nesting() {
        let text = r#"<link id=a><noscript><link id=b></noscript><link id=c>"#;
        let doc = Markup::scan(text);
        let flags: Vec<_> = doc.opening("link").map(|t| t.in_noscript).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_truncated_tag_stops_scan() {
        let doc = Markup::scan(r#"<p>ok</p><img src="x"#);
        let names: Vec<_> = doc.tags().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["p", "p"]);
    }

    #[test]
    fn test_stray_angle_brackets() {
        let doc = Markup::scan("a < b <3 <!DOCTYPE html><html>");
        let names: Vec<_> = doc.tags().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["html"]);
    }

    #[test]
    fn test_has_token() {
        let doc = Markup::scan(r#"<link rel="Preload StyleSheet">"#);
        let tag = &doc.tags()[0];
        assert!(doc.has_token(tag, "rel", "stylesheet"));
        assert!(!doc.has_token(tag, "rel", "preconnect"));
    }

    #[test]
    fn test_name_end() {
        let doc = Markup::scan("<SCRIPT src=a></SCRIPT>");
        assert_eq!(doc.tags()[0].name_end(), 7);
    }
}
