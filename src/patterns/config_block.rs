//! Inline framework configuration blocks.
//!
//! ```html
//! <script>
//!     tailwind.config = { theme: { extend: { colors: { a: { b: '#fff' } } } } }
//! </script>
//! ```
//!
//! The object literal is matched by balancing braces. Braces inside string
//! literals and comments do not count.

use regex::Regex;

/// Outcome of matching one inline script body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigBody {
    /// The script only assigns the config object.
    Exact,
    /// Starts with the assignment but cannot be removed safely.
    Ambiguous(&'static str),
}

/// Build the assignment prefix matcher for the given object names.
///
/// `tailwind.config` matches `tailwind.config = {` and `window.tailwind.config = {`.
pub fn assignment_regex(objects: &[String]) -> Option<Regex> {
    if objects.is_empty() {
        return None;
    }
    let names = objects
        .iter()
        .map(|o| regex::escape(o))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"^[ \t\r\n\x0C]*(?:window\.)?(?:{names})[ \t\r\n\x0C]*=[ \t\r\n\x0C]*\{{")).ok()
}

/// Match a script body against the assignment.
///
/// Returns `None` when the body is not a config assignment at all.
pub fn match_body(body: &str, assignment: &Regex) -> Option<ConfigBody> {
    let prefix = assignment.find(body)?;
    let open = prefix.end() - 1;

    let Some(close) = balanced_end(body, open) else {
        return Some(ConfigBody::Ambiguous("unbalanced braces in config object"));
    };

    let rest = body[close..].trim_start();
    let rest = rest.strip_prefix(';').unwrap_or(rest);
    if rest.trim().is_empty() {
        Some(ConfigBody::Exact)
    } else {
        Some(ConfigBody::Ambiguous("code follows the config object"))
    }
}

/// Offset just past the `}` matching the `{` at `open`.
fn balanced_end(src: &str, open: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            quote @ (b'"' | b'\'' | b'`') => {
                i = skip_string(bytes, i + 1, quote)?;
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = src[i..].find('\n').map_or(bytes.len(), |n| i + n);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = i + 2 + src[i + 2..].find("*/")? + 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Offset just past the closing quote of a string starting at `from`.
fn skip_string(bytes: &[u8], from: usize, quote: u8) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            b'\n' if quote != b'`' => return None,
            _ => i += 1,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tailwind() -> Regex {
        assignment_regex(&["tailwind.config".to_string()]).unwrap()
    }

    #[test]
    fn test_nested_braces() {
        let body = "tailwind.config = {theme:{extend:{colors:{a:{b:'#fff'}}}}}";
        assert_eq!(match_body(body, &tailwind()), Some(ConfigBody::Exact));
    }

    #[test]
    fn test_multiline_with_comments_and_strings() {
        let body = r#"
        tailwind.config = {
            theme: {
                extend: {
                    colors: {
                        brand: {
                            light: '#FDFBF7',  // Milky background }
                            quote: "a } in a string",
                        }
                    },
                    animation: {
                        'scroll': 'scroll 40s linear infinite', /* Slowed { down */
                    },
                }
            }
        };
        "#;
        assert_eq!(match_body(body, &tailwind()), Some(ConfigBody::Exact));
    }

    #[test]
    fn test_window_prefix() {
        let body = "window.tailwind.config={darkMode:'class'}";
        assert_eq!(match_body(body, &tailwind()), Some(ConfigBody::Exact));
    }

    #[test]
    fn test_not_a_config_block() {
        assert_eq!(match_body("console.log(tailwind.config)", &tailwind()), None);
        assert_eq!(match_body("AOS.init({})", &tailwind()), None);
    }

    #[test]
    fn test_unbalanced() {
        let body = "tailwind.config = { theme: { extend: {} }";
        assert_eq!(
            match_body(body, &tailwind()),
            Some(ConfigBody::Ambiguous("unbalanced braces in config object"))
        );
    }

    #[test]
    fn test_trailing_code() {
        let body = "tailwind.config = {}; initTheme();";
        assert_eq!(
            match_body(body, &tailwind()),
            Some(ConfigBody::Ambiguous("code follows the config object"))
        );
    }

    #[test]
    fn test_escaped_quote() {
        let body = r"tailwind.config = { a: 'it\'s }' }";
        assert_eq!(match_body(body, &tailwind()), Some(ConfigBody::Exact));
    }

    #[test]
    fn test_no_objects_no_regex() {
        assert!(assignment_regex(&[]).is_none());
    }
}
