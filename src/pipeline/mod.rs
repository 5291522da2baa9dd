//! Per-document rewrite pipeline.
//!
//! ```text
//! text ─▶ strip-framework ─▶ async-fonts ─▶ defer-scripts
//!      ─▶ inject-stylesheet ─▶ preconnect ─▶ minify ─▶ text
//! ```
//!
//! The order is fixed. `async-fonts`, `defer-scripts`, `preconnect` and
//! `minify` can be switched off; the other two always run. Warnings are
//! collected and never stop the pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::artifact::StylesheetArtifact;
use crate::config::BakeConfig;
use crate::patterns::PatternLibrary;
use crate::rewrite::{
    AsyncFonts, Context, DeferScripts, InjectPreconnect, InjectStylesheet, Issue, Minify, Rewrite,
    StripFramework,
};

/// Outcome of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub path: PathBuf,
    /// The final text differs from the input.
    ///
    /// Steps may report changes that a later step undoes, such as `minify`
    /// collapsing the line break `inject-stylesheet` added. Those leave this
    /// false.
    pub changed: bool,
    pub warnings: Vec<Issue>,
}

/// Ordered steps plus the matchers they share.
pub struct Pipeline {
    patterns: PatternLibrary,
    steps: Vec<Box<dyn Rewrite>>,
}

impl Pipeline {
    pub fn new(config: &BakeConfig, artifact: Arc<StylesheetArtifact>) -> Self {
        let linked = artifact.linked_target(&config.corpus.root);
        let patterns = PatternLibrary::new(&config.patterns, linked);
        let rewrite = &config.rewrite;

        let mut steps: Vec<Box<dyn Rewrite>> = vec![Box::new(StripFramework)];
        if rewrite.async_fonts {
            steps.push(Box::new(AsyncFonts));
        }
        if rewrite.defer_scripts {
            steps.push(Box::new(DeferScripts));
        }
        steps.push(Box::new(InjectStylesheet::new(artifact)));
        if rewrite.preconnect {
            let mut denylist = config.preconnect.denylist();
            denylist.extend(
                config
                    .patterns
                    .stale_hint_hosts
                    .iter()
                    .map(|h| h.trim().to_ascii_lowercase()),
            );
            steps.push(Box::new(InjectPreconnect::new(config.preconnect.window, denylist)));
        }
        if rewrite.minify {
            steps.push(Box::new(Minify));
        }

        Self { patterns, steps }
    }

    /// Names of the enabled steps, in run order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step over `text`.
    ///
    /// `path` is where the document lives; linked stylesheet hrefs are made
    /// relative to it.
    pub fn run(&self, path: &Path, text: &str) -> (String, PipelineReport) {
        let mut cx = Context::new(&self.patterns, path);
        let mut current = text.to_string();
        let mut changed = false;

        for step in &self.steps {
            let result = step.rewrite(&current, &mut cx);
            if result.changed {
                crate::debug!("step"; "{} changed {}", step.name(), path.display());
                changed = true;
                current = result.text;
            }
        }

        let report = PipelineReport {
            path: path.to_path_buf(),
            changed: changed && current != text,
            warnings: cx.issues,
        };
        (current, report)
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Delivery;
    use crate::patterns::Anchor;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <!-- Tailwind Play CDN -->
    <script src="https://cdn.tailwindcss.com"></script>
    <script>
        tailwind.config = {
            theme: { extend: { colors: { brand: { 500: '#0ea5e9' } } } }
        }
    </script>
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;700" rel="stylesheet">
    <title>Home</title>
</head>
<body class="font-sans">
    <img src="https://images.unsplash.com/photo-1?w=1200" alt="">
    <script src="js/app.js"></script>
    <script type="module" src="js/mod.js"></script>
</body>
</html>
"#;

    fn config(delivery: Delivery, minify: bool) -> BakeConfig {
        let mut config = BakeConfig::default();
        config.corpus.root = PathBuf::from("/site");
        config.stylesheet.delivery = delivery;
        config.stylesheet.output = PathBuf::from("/site/assets/css/styles.css");
        config.rewrite.minify = minify;
        config
    }

    fn pipeline(config: &BakeConfig) -> Pipeline {
        let artifact = StylesheetArtifact::new(
            ".bg-brand-500{background:#0ea5e9}",
            config.stylesheet.delivery,
            &config.stylesheet.output,
            None,
        );
        Pipeline::new(config, Arc::new(artifact))
    }

    fn run(pipeline: &Pipeline, text: &str) -> (String, PipelineReport) {
        pipeline.run(Path::new("/site/index.html"), text)
    }

    #[test]
    fn test_step_order_and_toggles() {
        let all = pipeline(&config(Delivery::Inline, true));
        assert_eq!(
            all.step_names(),
            vec![
                "strip-framework",
                "async-fonts",
                "defer-scripts",
                "inject-stylesheet",
                "preconnect",
                "minify"
            ]
        );

        let mut off = config(Delivery::Inline, false);
        off.rewrite.async_fonts = false;
        off.rewrite.defer_scripts = false;
        off.rewrite.preconnect = false;
        assert_eq!(
            pipeline(&off).step_names(),
            vec!["strip-framework", "inject-stylesheet"]
        );
    }

    #[test]
    fn test_framework_replaced_by_inline_stylesheet() {
        let (out, report) = run(&pipeline(&config(Delivery::Inline, false)), PAGE);
        assert!(report.changed);
        assert!(report.warnings.is_empty());

        assert!(!out.contains("cdn.tailwindcss.com"));
        assert!(!out.contains("tailwind.config"));
        assert_eq!(out.matches("<style id=\"critical-tailwind\">").count(), 1);
        assert!(out.contains(
            "<style id=\"critical-tailwind\">.bg-brand-500{background:#0ea5e9}</style>\n</head>"
        ));
    }

    #[test]
    fn test_fonts_scripts_and_hints() {
        let (out, _) = run(&pipeline(&config(Delivery::Inline, false)), PAGE);
        assert!(out.contains(
            r#"<link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;700&display=swap" rel="stylesheet" media="print" onload="this.media='all'"><noscript><link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;700&display=swap" rel="stylesheet"></noscript>"#
        ));
        assert!(out.contains(r#"<script defer src="js/app.js"></script>"#));
        assert!(out.contains(r#"<script type="module" src="js/mod.js"></script>"#));
        assert!(out.contains(
            "<head>\n<link rel=\"preconnect\" href=\"https://images.unsplash.com\" crossorigin>\n"
        ));
    }

    #[test]
    fn test_full_pipeline_idempotent() {
        for delivery in [Delivery::Inline, Delivery::Linked] {
            for minify in [true, false] {
                let pipeline = pipeline(&config(delivery, minify));
                let (first, _) = run(&pipeline, PAGE);
                let (second, report) = run(&pipeline, &first);
                assert!(!report.changed, "{delivery:?} minify={minify}:\n{second}");
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn test_minified_output() {
        let (out, _) = run(&pipeline(&config(Delivery::Linked, true)), PAGE);
        assert!(!out.contains("<!--"));
        assert!(out.lines().all(|l| !l.is_empty() && l.trim() == l));
        assert!(out.ends_with("</html>\n"));
        assert!(out.contains("<link href=\"assets/css/styles.css\" rel=\"stylesheet\">\n</head>"));
    }

    #[test]
    fn test_delivery_switch_keeps_single_block() {
        let (inline, _) = run(&pipeline(&config(Delivery::Inline, true)), PAGE);
        let (linked, report) = run(&pipeline(&config(Delivery::Linked, true)), &inline);
        assert!(report.changed);
        assert!(!linked.contains("critical-tailwind"));
        assert_eq!(linked.matches("assets/css/styles.css").count(), 1);
    }

    #[test]
    fn test_linked_idempotent_in_every_directory() {
        let config = config(Delivery::Linked, false);
        let pipeline = pipeline(&config);
        let vendor = r#"<link rel="stylesheet" href="https://cdn.vendor.com/theme/assets/css/styles.css">"#;
        let text = format!("<head>\n{vendor}\n<title>t</title>\n</head>\n");

        for path in ["/site/index.html", "/site/assets/demo.html", "/site/blog/index.html"] {
            let path = Path::new(path);
            let (first, report) = pipeline.run(path, &text);
            assert!(report.changed);
            assert!(first.contains(vendor), "{first}");

            let (second, report) = pipeline.run(path, &first);
            assert!(!report.changed, "{}", path.display());
            assert_eq!(first, second);
            assert_eq!(second.matches("rel=\"stylesheet\"").count(), 2);
        }
    }

    #[test]
    fn test_empty_comment_hides_nothing() {
        let pipeline = pipeline(&config(Delivery::Inline, false));
        let text = "<head>\n<!-->\n<script src=\"https://cdn.tailwindcss.com\"></script>\n</head>\n<body></body>\n";
        let (out, report) = run(&pipeline, text);

        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert!(!out.contains("cdn.tailwindcss.com"));
        assert_eq!(out.matches("critical-tailwind").count(), 1);
    }

    #[test]
    fn test_fragment_without_head_warns() {
        let pipeline = pipeline(&config(Delivery::Inline, false));
        let (out, report) = run(&pipeline, "<p>partial</p>\n");
        assert_eq!(out, "<p>partial</p>\n");
        assert!(!report.changed);
        assert_eq!(
            report.warnings,
            vec![Issue::AnchorMissing {
                step: "inject-stylesheet",
                anchor: Anchor::HeadClose
            }]
        );
    }
}
