//! Forward-slash paths for use inside HTML attributes.
//!
//! Hrefs written into documents never depend on the host's separator.

use std::path::{Component, Path, PathBuf};

/// Compute the href that reaches `target` from a document living in `from_dir`.
///
/// Both paths must be absolute (or both relative to the same base).
///
/// # Examples
/// ```text
/// from_dir = /site/blog   target = /site/assets/app.css  -> ../assets/app.css
/// from_dir = /site        target = /site/assets/app.css  -> assets/app.css
/// ```
pub fn relative_href(from_dir: &Path, target: &Path) -> String {
    let from: Vec<_> = from_dir.components().collect();
    let to: Vec<_> = target.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for c in &from[common..] {
        if matches!(c, Component::Normal(_)) {
            parts.push("..".into());
        }
    }
    for c in &to[common..] {
        if let Component::Normal(part) = c {
            parts.push(part.to_string_lossy().into_owned());
        }
    }

    parts.join("/").replace('\\', "/")
}

/// Resolve a same-site href to the filesystem path it points at.
///
/// Relative hrefs resolve against `dir`, root-absolute ones (`/a.css`)
/// against `root`. Query and fragment are ignored, `.` and `..` are folded
/// lexically. Hrefs with a scheme or starting with `//` point at another
/// origin and give `None`.
///
/// # Examples
/// ```text
/// dir = /site/blog   href = ../assets/a.css?v=1  -> /site/assets/a.css
/// root = /site       href = /assets/a.css        -> /site/assets/a.css
/// ```
pub fn resolve_href(href: &str, dir: &Path, root: &Path) -> Option<PathBuf> {
    let href = href.trim();
    if href.starts_with("//") || has_scheme(href) {
        return None;
    }
    let end = href.find(['?', '#']).unwrap_or(href.len());
    let path = &href[..end];
    if path.is_empty() {
        return None;
    }

    let (mut resolved, rest) = match path.strip_prefix('/') {
        Some(rest) => (root.to_path_buf(), rest),
        None => (dir.to_path_buf(), path),
    };
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                resolved.pop();
            }
            part => resolved.push(part),
        }
    }
    Some(resolved)
}

/// `scheme:` prefix per RFC 3986 (`https:`, `data:`, `mailto:`).
fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
