//! `[preconnect]` section.
//!
//! # Example
//!
//! ```toml
//! [preconnect]
//! window = 12000
//! exclude = ["stats.example.com"]
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Hosts never given a hint: the framework CDN and the font/icon hosts the
/// other steps already handle.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "cdn.tailwindcss.com",
    "fonts.googleapis.com",
    "fonts.gstatic.com",
    "fonts.bunny.net",
    "use.typekit.net",
    "use.fontawesome.com",
    "kit.fontawesome.com",
    "ka-f.fontawesome.com",
    "cdnjs.cloudflare.com",
    "cdn.jsdelivr.net",
    "unpkg.com",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreconnectConfig {
    /// Bytes of minified body text scanned for media hosts.
    pub window: usize,
    /// Extra hosts never hinted. Subdomains are excluded too.
    pub exclude: Vec<String>,
}

pub struct PreconnectFields {
    pub window: FieldPath,
    pub exclude: FieldPath,
}

impl PreconnectConfig {
    pub const FIELDS: PreconnectFields = PreconnectFields {
        window: FieldPath::new("preconnect.window"),
        exclude: FieldPath::new("preconnect.exclude"),
    };

    /// Built-in denylist followed by configured hosts, lowercased.
    pub fn denylist(&self) -> Vec<String> {
        DEFAULT_DENYLIST
            .iter()
            .map(|h| (*h).to_string())
            .chain(self.exclude.iter().map(|h| h.trim().to_ascii_lowercase()))
            .collect()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.window == 0 {
            diag.error(Self::FIELDS.window, "must be greater than 0");
        }
        for host in &self.exclude {
            if host.contains("://") || host.contains('/') {
                diag.error_with_hint(
                    Self::FIELDS.exclude,
                    format!("`{host}` is not a host name"),
                    "list bare hosts such as \"cdn.example.com\"",
                );
            }
        }
    }
}

impl Default for PreconnectConfig {
    fn default() -> Self {
        Self {
            window: 12_000,
            exclude: Vec::new(),
        }
    }
}
