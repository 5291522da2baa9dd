//! Named matchers shared by the rewrite steps.
//!
//! Every matcher works on a scanned [`Markup`], so comments and the bodies of
//! raw text elements never produce matches, and attribute order, quoting and
//! case do not matter.
//!
//! | Matcher              | Matches                                              |
//! |----------------------|------------------------------------------------------|
//! | `framework_scripts`  | `<script src>` loading the runtime framework         |
//! | `config_blocks`      | inline `<script>` assigning the framework config     |
//! | `stale_hints`        | preconnect/dns-prefetch/preload to the framework CDN |
//! | `font_links`         | `<link rel=stylesheet>` to a font or icon host       |
//! | `external_scripts`   | classic `<script src>` without `defer`/`async`       |
//! | `injected_inline`    | `<style id="critical-tailwind">` from earlier runs   |
//! | `injected_linked`    | `<link rel=stylesheet>` to the stylesheet output     |

mod anchor;
mod config_block;

pub use anchor::{Anchor, AnchorError};
pub use config_block::ConfigBody;

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::PatternsConfig;
use crate::markup::{Markup, Tag};
use crate::utils::path::resolve_href;

/// `id` of the inline stylesheet block.
pub const INLINE_MARKER_ID: &str = "critical-tailwind";

/// `type` values of classic scripts.
const JS_MIME_TYPES: &[&str] = &[
    "text/javascript",
    "application/javascript",
    "application/x-javascript",
    "text/ecmascript",
    "application/ecmascript",
    "text/jscript",
];

/// `rel` tokens of resource hints.
const HINT_RELS: &[&str] = &["preconnect", "dns-prefetch", "preload"];

/// An inline config script and whether it can be removed.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBlock<'d> {
    pub tag: &'d Tag,
    pub body: ConfigBody,
}

/// Where linked stylesheet blocks point.
#[derive(Debug, Clone, Default)]
pub struct LinkedTarget {
    /// The compiled stylesheet on disk.
    pub output: PathBuf,
    /// Directory root-absolute hrefs (`/assets/a.css`) resolve against.
    pub root: PathBuf,
    /// Configured href, recognized verbatim even on another origin.
    pub href: Option<String>,
}

impl LinkedTarget {
    /// Whether `href`, found in `document`, points at the stylesheet.
    fn matches(&self, href: &str, document: &Path) -> bool {
        let href = href.trim();
        if self.href.as_deref().is_some_and(|h| h.trim() == href) {
            return true;
        }
        if self.output.as_os_str().is_empty() {
            return false;
        }
        let dir = document.parent().unwrap_or(Path::new(""));
        resolve_href(href, dir, &self.root).is_some_and(|path| path == self.output)
    }
}

/// Compiled matchers. Built once per run and shared by every document.
#[derive(Debug)]
pub struct PatternLibrary {
    framework_scripts: Vec<String>,
    config_assignment: Option<Regex>,
    font_hosts: Vec<String>,
    stale_hint_hosts: Vec<String>,
    linked: LinkedTarget,
}

impl PatternLibrary {
    /// `linked` describes the stylesheet a linked block written by any run
    /// points at.
    pub fn new(config: &PatternsConfig, linked: LinkedTarget) -> Self {
        let lower = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };

        Self {
            framework_scripts: lower(&config.framework_scripts),
            config_assignment: config_block::assignment_regex(&config.config_objects),
            font_hosts: lower(&config.font_hosts),
            stale_hint_hosts: lower(&config.stale_hint_hosts),
            linked,
        }
    }

    /// `<script src>` loading the runtime framework, whatever other attributes it has.
    pub fn framework_scripts<'d>(&self, doc: &'d Markup<'_>) -> Vec<&'d Tag> {
        doc.opening("script")
            .filter(|tag| {
                doc.value(tag, "src")
                    .is_some_and(|src| contains_any(src, &self.framework_scripts))
            })
            .collect()
    }

    /// Inline scripts whose body starts with a config object assignment.
    pub fn config_blocks<'d>(&self, doc: &'d Markup<'_>) -> Vec<ConfigBlock<'d>> {
        let Some(assignment) = &self.config_assignment else {
            return Vec::new();
        };

        doc.opening("script")
            .filter(|tag| !tag.has_attr("src") && tag.is_terminated())
            .filter_map(|tag| {
                let content = tag.raw.as_ref()?.content.clone();
                let body = config_block::match_body(doc.slice(&content), assignment)?;
                Some(ConfigBlock { tag, body })
            })
            .collect()
    }

    /// Resource hints pointing at a framework host.
    pub fn stale_hints<'d>(&self, doc: &'d Markup<'_>) -> Vec<&'d Tag> {
        doc.opening("link")
            .filter(|tag| HINT_RELS.iter().any(|rel| doc.has_token(tag, "rel", rel)))
            .filter(|tag| {
                doc.value(tag, "href")
                    .is_some_and(|href| contains_any(href, &self.stale_hint_hosts))
            })
            .collect()
    }

    /// Stylesheet links to font and icon hosts, outside `<noscript>`.
    pub fn font_links<'d>(&self, doc: &'d Markup<'_>) -> Vec<&'d Tag> {
        doc.opening("link")
            .filter(|tag| !tag.in_noscript && doc.has_token(tag, "rel", "stylesheet"))
            .filter(|tag| {
                doc.value(tag, "href")
                    .is_some_and(|href| contains_any(href, &self.font_hosts))
            })
            .collect()
    }

    /// Classic external scripts that block parsing.
    ///
    /// Excludes modules, structured data and other non-JavaScript types, and
    /// scripts already carrying `defer` or `async`.
    pub fn external_scripts<'d>(&self, doc: &'d Markup<'_>) -> Vec<&'d Tag> {
        doc.opening("script")
            .filter(|tag| doc.value(tag, "src").is_some_and(|src| !src.trim().is_empty()))
            .filter(|tag| !tag.has_attr("defer") && !tag.has_attr("async"))
            .filter(|tag| match doc.value(tag, "type").map(str::trim) {
                None | Some("") => true,
                Some(ty) => JS_MIME_TYPES.iter().any(|m| ty.eq_ignore_ascii_case(m)),
            })
            .collect()
    }

    /// Inline stylesheet blocks written by an earlier run.
    pub fn injected_inline<'d>(&self, doc: &'d Markup<'_>) -> Vec<&'d Tag> {
        doc.opening("style")
            .filter(|tag| doc.value(tag, "id") == Some(INLINE_MARKER_ID))
            .collect()
    }

    /// Stylesheet links to the compiled output written by an earlier run.
    ///
    /// An href matches when it resolves from `document` to the output path,
    /// or when it equals the configured href. Other origins never match
    /// otherwise.
    pub fn injected_linked<'d>(&self, doc: &'d Markup<'_>, document: &Path) -> Vec<&'d Tag> {
        doc.opening("link")
            .filter(|tag| doc.has_token(tag, "rel", "stylesheet"))
            .filter(|tag| {
                doc.value(tag, "href")
                    .is_some_and(|href| self.linked.matches(href, document))
            })
            .collect()
    }
}

/// ASCII case-insensitive substring test against lowercased fragments.
fn contains_any(value: &str, fragments: &[String]) -> bool {
    let value = value.to_ascii_lowercase();
    fragments.iter().any(|f| value.contains(f.as_str()))
}
