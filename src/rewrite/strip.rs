//! Remove the runtime framework.
//!
//! Drops the framework `<script src>`, the inline config assignment, and
//! resource hints to the framework CDN. An element alone on its line takes
//! the line with it.

use super::{Context, Issue, Rewrite, RewriteResult};
use crate::markup::{Edit, Markup, line_extent};
use crate::patterns::ConfigBody;

const NAME: &str = "strip-framework";

pub struct StripFramework;

impl Rewrite for StripFramework {
    fn name(&self) -> &'static str {
        NAME
    }

    fn rewrite(&self, text: &str, cx: &mut Context<'_>) -> RewriteResult {
        let doc = Markup::scan(text);
        let patterns = cx.patterns;
        let mut edits = Vec::new();

        for tag in patterns.framework_scripts(&doc) {
            if tag.is_terminated() {
                edits.push(Edit::remove(line_extent(text, tag.outer())));
            } else {
                cx.issue(Issue::ambiguity(NAME, "framework script without `</script>` left in place"));
            }
        }

        for block in patterns.config_blocks(&doc) {
            match block.body {
                ConfigBody::Exact => edits.push(Edit::remove(line_extent(text, block.tag.outer()))),
                ConfigBody::Ambiguous(reason) => {
                    cx.issue(Issue::ambiguity(NAME, format!("{reason}, config block left in place")));
                }
            }
        }

        for tag in patterns.stale_hints(&doc) {
            edits.push(Edit::remove(line_extent(text, tag.span.clone())));
        }

        RewriteResult::from_edits(text, edits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::testing::{assert_idempotent, run};

    #[test]
    fn test_removes_script_and_nested_config() {
        let text = "<head><script src=\"x/tailwindcss.js\" defer></script><script>tailwind.config = {theme:{extend:{colors:{a:{b:'#fff'}}}}}</script></head><body></body>";
        let (result, issues) = run(&StripFramework, text);
        assert!(result.changed);
        assert!(issues.is_empty());
        assert_eq!(result.text, "<head></head><body></body>");
    }

    #[test]
    fn test_removes_whole_lines() {
        let text = "<head>\n    <meta charset=\"utf-8\">\n    <script src=\"https://cdn.tailwindcss.com\"></script>\n    <link rel=\"preconnect\" href=\"https://cdn.tailwindcss.com\">\n    <script>\n        tailwind.config = {\n            theme: { extend: {} }\n        }\n    </script>\n    <title>t</title>\n</head>\n";
        let out = assert_idempotent(&StripFramework, text);
        assert_eq!(
            out,
            "<head>\n    <meta charset=\"utf-8\">\n    <title>t</title>\n</head>\n"
        );
    }

    #[test]
    fn test_ambiguous_config_left_in_place() {
        let text = "<head><script>tailwind.config = {a: 1}; init();</script></head>";
        let (result, issues) = run(&StripFramework, text);
        assert!(!result.changed);
        assert_eq!(result.text, text);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("code follows the config object"));
    }

    #[test]
    fn test_unbalanced_config_left_in_place() {
        let text = "<script>tailwind.config = { theme: {</script>";
        let (result, issues) = run(&StripFramework, text);
        assert!(!result.changed);
        assert!(matches!(issues[0], Issue::MatchAmbiguity { .. }));
    }

    #[test]
    fn test_unterminated_framework_script() {
        let text = "<head><script src=\"https://cdn.tailwindcss.com\">";
        let (result, issues) = run(&StripFramework, text);
        assert!(!result.changed);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_empty_comment_before_script() {
        let text = "<head>\n<!-->\n<script src=\"https://cdn.tailwindcss.com\"></script>\n<!--->\n</head>\n";
        let (result, issues) = run(&StripFramework, text);
        assert!(issues.is_empty());
        assert_eq!(result.text, "<head>\n<!-->\n<!--->\n</head>\n");
    }

    #[test]
    fn test_other_scripts_untouched() {
        let text = "<script src=\"app.js\"></script><script>AOS.init({})</script>";
        let (result, issues) = run(&StripFramework, text);
        assert!(!result.changed);
        assert!(issues.is_empty());
    }
}
