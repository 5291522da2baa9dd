//! Preconnect hints for media hosts near the top of the page.
//!
//! Only a leading window of the body is scanned. The window is measured on
//! the minified form of the body, so running with or without minification
//! sees the same resources.

use rustc_hash::FxHashSet;
use url::Url;

use super::{Context, Issue, Rewrite, RewriteResult, collapse};
use crate::markup::{Edit, Markup};
use crate::patterns::Anchor;

const NAME: &str = "preconnect";

/// Elements whose `src`/`poster` load media.
const MEDIA_TAGS: &[&str] = &["img", "video", "audio", "source"];

const HINT_RELS: &[&str] = &["preconnect", "dns-prefetch"];

pub struct InjectPreconnect {
    window: usize,
    denylist: Vec<String>,
}

impl InjectPreconnect {
    /// `denylist` entries exclude the host and its subdomains.
    pub fn new(window: usize, denylist: Vec<String>) -> Self {
        Self { window, denylist }
    }

    fn is_denied(&self, host: &str) -> bool {
        self.denylist.iter().any(|d| {
            host == d
                || host
                    .strip_suffix(d.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}

impl Rewrite for InjectPreconnect {
    fn name(&self) -> &'static str {
        NAME
    }

    fn rewrite(&self, text: &str, cx: &mut Context<'_>) -> RewriteResult {
        let doc = Markup::scan(text);
        let body_start = Anchor::BodyOpen.first(&doc).map_or(0, |span| span.start);

        let hinted: FxHashSet<String> = doc
            .opening("link")
            .filter(|t| t.span.start < body_start || body_start == 0)
            .filter(|t| HINT_RELS.iter().any(|rel| doc.has_token(t, "rel", rel)))
            .filter_map(|t| doc.value(t, "href").and_then(origin))
            .map(|(_, host)| host)
            .collect();

        let mut seen = FxHashSet::default();
        let mut origins = Vec::new();
        for (origin, host) in self.media_origins(&text[body_start..]) {
            if self.is_denied(&host) || hinted.contains(&host) || !seen.insert(host) {
                continue;
            }
            origins.push(origin);
        }

        if origins.is_empty() {
            return RewriteResult::unchanged(text);
        }

        let head_open = match Anchor::HeadOpen.locate(&doc) {
            Ok(span) => span,
            Err(err) => {
                cx.issue(Issue::from_anchor(NAME, err));
                return RewriteResult::unchanged(text);
            }
        };

        let hints: String = origins
            .iter()
            .map(|o| format!("\n<link rel=\"preconnect\" href=\"{o}\" crossorigin>"))
            .collect();

        RewriteResult::from_edits(text, vec![Edit::insert(head_open.end, hints)])
    }
}

impl InjectPreconnect {
    /// `(origin, host)` of absolute media URLs in the window, in order.
    fn media_origins(&self, region: &str) -> Vec<(String, String)> {
        let projected = collapse(region);
        let mut cut = self.window.min(projected.len());
        while !projected.is_char_boundary(cut) {
            cut -= 1;
        }

        let window = Markup::scan(&projected[..cut]);
        window
            .tags()
            .iter()
            .filter(|t| !t.closing && MEDIA_TAGS.contains(&t.name.as_str()))
            .flat_map(|t| ["src", "poster"].into_iter().filter_map(|a| window.value(t, a)))
            .filter_map(origin)
            .collect()
    }
}

/// Origin and host of an absolute `http(s)` or protocol-relative URL.
fn origin(value: &str) -> Option<(String, String)> {
    let value = value.trim();
    let absolute = if value.starts_with("//") {
        format!("https:{value}")
    } else {
        let scheme = value.get(..8)?.to_ascii_lowercase();
        if !(scheme.starts_with("http://") || scheme.starts_with("https://")) {
            return None;
        }
        value.to_string()
    };

    let url = Url::parse(&absolute).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    Some((url.origin().ascii_serialization(), host))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreconnectConfig;
    use crate::rewrite::testing::{assert_idempotent, run};

    fn step(window: usize) -> InjectPreconnect {
        let config = PreconnectConfig {
            window,
            exclude: vec!["stats.example.org".into()],
        };
        InjectPreconnect::new(window, config.denylist())
    }

    #[test]
    fn test_hints_in_discovery_order() {
        let text = r#"<html><head>
<title>t</title>
</head>
<body>
<img src="https://images.unsplash.com/photo-1?w=800">
<video poster="//media.example.com/p.jpg"><source src="https://cdn.example.net/v.mp4"></video>
<img src="https://images.unsplash.com/photo-2">
<img src="/local.png">
</body></html>"#;
        let out = assert_idempotent(&step(12_000), text);
        assert!(out.starts_with(
            "<html><head>\n<link rel=\"preconnect\" href=\"https://images.unsplash.com\" crossorigin>\n<link rel=\"preconnect\" href=\"https://media.example.com\" crossorigin>\n<link rel=\"preconnect\" href=\"https://cdn.example.net\" crossorigin>\n<title>"
        ));
    }

    #[test]
    fn test_bounded_window() {
        let filler = "<p>filler</p>\n".repeat(100);
        let text = format!(
            "<head></head><body>\n<img src=\"https://early.example.com/a.png\">\n{filler}<img src=\"https://late.example.com/b.png\">\n</body>"
        );
        let (result, _) = run(&step(200), &text);
        assert!(result.text.contains("https://early.example.com"));
        assert!(!result.text.contains("href=\"https://late.example.com\""));
    }

    #[test]
    fn test_window_measured_on_minified_body() {
        // Indentation and comments would push the image out of a raw window.
        let padding = format!("    <!-- {} -->\n", "x".repeat(300));
        let text = format!(
            "<head></head><body>\n{padding}    <img src=\"https://img.example.com/a.png\">\n</body>"
        );
        let (result, _) = run(&step(100), &text);
        assert!(result.text.contains("href=\"https://img.example.com\""));
    }

    #[test]
    fn test_denylist_and_existing_hints() {
        let text = r#"<head><link rel="dns-prefetch" href="//img.example.com"></head><body>
<img src="https://fonts.gstatic.com/a.png">
<img src="https://static.cdn.jsdelivr.net/a.png">
<img src="https://stats.example.org/p.gif">
<img src="https://img.example.com/a.png">
</body>"#;
        let (result, _) = run(&step(12_000), text);
        assert!(!result.changed);
    }

    #[test]
    fn test_missing_head_only_when_needed() {
        let (result, issues) = run(&step(12_000), "<body><p>no media</p></body>");
        assert!(!result.changed);
        assert!(issues.is_empty());

        let (result, issues) = run(
            &step(12_000),
            "<body><img src=\"https://img.example.com/a.png\"></body>",
        );
        assert!(!result.changed);
        assert_eq!(
            issues,
            vec![Issue::AnchorMissing {
                step: NAME,
                anchor: Anchor::HeadOpen
            }]
        );
    }

    #[test]
    fn test_origin() {
        assert_eq!(
            origin("https://Images.Example.com:8443/a.png"),
            Some(("https://images.example.com:8443".into(), "images.example.com".into()))
        );
        assert_eq!(
            origin("//cdn.example.com/a.png").map(|o| o.0),
            Some("https://cdn.example.com".into())
        );
        assert_eq!(origin("data:image/png;base64,xx"), None);
        assert_eq!(origin("/img/a.png"), None);
        assert_eq!(origin("mailto:team@example.com"), None);
    }
}
