//! `[rewrite]` section: toggles for the optional rewrite steps.
//!
//! Stripping the framework runtime and injecting the stylesheet always run.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Strip comments and blank lines.
    pub minify: bool,
    /// Add `defer` to external classic scripts.
    pub defer_scripts: bool,
    /// Load font and icon stylesheets without blocking render.
    pub async_fonts: bool,
    /// Add preconnect hints for media hosts near the top of the body.
    pub preconnect: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            minify: true,
            defer_scripts: true,
            async_fonts: true,
            preconnect: true,
        }
    }
}
