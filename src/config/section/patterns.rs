//! `[patterns]` section: what counts as the framework runtime and as a font host.
//!
//! Entries are plain substrings matched against `src`/`href` values, except
//! `config_objects`, which are JavaScript names assigned an object literal.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// `src` fragments identifying the runtime framework script.
    pub framework_scripts: Vec<String>,
    /// Names of the global config object (`tailwind.config`).
    pub config_objects: Vec<String>,
    /// `href` fragments identifying font and icon stylesheets.
    pub font_hosts: Vec<String>,
    /// Hosts whose preconnect/dns-prefetch/preload hints are removed.
    pub stale_hint_hosts: Vec<String>,
}

pub struct PatternsFields {
    pub framework_scripts: FieldPath,
    pub config_objects: FieldPath,
    pub font_hosts: FieldPath,
    pub stale_hint_hosts: FieldPath,
}

impl PatternsConfig {
    pub const FIELDS: PatternsFields = PatternsFields {
        framework_scripts: FieldPath::new("patterns.framework_scripts"),
        config_objects: FieldPath::new("patterns.config_objects"),
        font_hosts: FieldPath::new("patterns.font_hosts"),
        stale_hint_hosts: FieldPath::new("patterns.stale_hint_hosts"),
    };

    /// Empty fragments would match every tag.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let lists = [
            (Self::FIELDS.framework_scripts, &self.framework_scripts),
            (Self::FIELDS.config_objects, &self.config_objects),
            (Self::FIELDS.font_hosts, &self.font_hosts),
            (Self::FIELDS.stale_hint_hosts, &self.stale_hint_hosts),
        ];
        for (field, list) in lists {
            if list.iter().any(|s| s.trim().is_empty()) {
                diag.error(field, format!("{field} contains an empty entry"));
            }
        }

        for name in &self.config_objects {
            let valid = name
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$'));
            if !name.trim().is_empty() && !valid {
                diag.error_with_hint(
                    Self::FIELDS.config_objects,
                    format!("`{name}` is not a dotted JavaScript name"),
                    "use names like \"tailwind.config\"",
                );
            }
        }

        if self.framework_scripts.is_empty() {
            diag.warn(
                Self::FIELDS.framework_scripts,
                "empty, framework scripts will not be removed",
            );
        }
    }
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            framework_scripts: vec![
                "cdn.tailwindcss.com".into(),
                "tailwindcss.js".into(),
                "@tailwindcss/browser".into(),
            ],
            config_objects: vec!["tailwind.config".into()],
            font_hosts: vec![
                "fonts.googleapis.com".into(),
                "fonts.bunny.net".into(),
                "use.typekit.net".into(),
                "use.fontawesome.com".into(),
                "kit.fontawesome.com".into(),
                "cdnjs.cloudflare.com/ajax/libs/font-awesome".into(),
                "cdn.jsdelivr.net/npm/bootstrap-icons".into(),
            ],
            stale_hint_hosts: vec!["cdn.tailwindcss.com".into()],
        }
    }
}
