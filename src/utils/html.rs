//! HTML utility functions.
//!
//! - `escape_attr()` - entity escaping for values written into attributes
//! - `is_raw_text_element()` - elements whose content is never scanned for tags

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require escaping inside a double-quoted attribute.
const ATTR_ESCAPE_CHARS: [char; 4] = ['<', '>', '&', '"'];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        _ => None,
    }
}

/// Escape a value for a double-quoted HTML attribute.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
/// Existing entities (`&amp;`) are left alone so hrefs copied out of a
/// document survive a round trip unchanged.
///
/// # Example
/// ```ignore
/// assert_eq!(escape_attr("a\"b"), "a&quot;b");
/// assert_eq!(escape_attr("assets/app.css"), "assets/app.css"); // No allocation
/// ```
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(ATTR_ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for (i, c) in s.char_indices() {
        if c == '&' && is_entity_start(&s[i..]) {
            result.push(c);
            continue;
        }
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// `&name;` or `&#123;` at the start of `s`.
fn is_entity_start(s: &str) -> bool {
    let body = &s[1..];
    let end = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))
        .unwrap_or(body.len());
    end > 0 && end <= 10 && body[end..].starts_with(';')
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if tag is a raw text element (content is not markup).
///
/// Per the HTML standard: script and style content is "raw text", textarea and
/// title are "escapable raw text". Neither may contain tags.
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

// =============================================================================
// Tests
// =============================================================================
