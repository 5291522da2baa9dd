//! `[corpus]` section: which documents are rewritten.
//!
//! # Example
//!
//! ```toml
//! [corpus]
//! root = "public"
//! extensions = ["html", "htm"]
//! exclude = [".git", "node_modules"]
//! parallel = true
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Directory searched for documents, relative to the config file.
    pub root: PathBuf,
    /// File extensions treated as documents (without the dot).
    pub extensions: Vec<String>,
    /// Directory names skipped at any depth.
    pub exclude: Vec<String>,
    /// Process documents on a thread pool.
    pub parallel: bool,
}

pub struct CorpusFields {
    pub root: FieldPath,
    pub extensions: FieldPath,
    pub exclude: FieldPath,
}

impl CorpusConfig {
    pub const FIELDS: CorpusFields = CorpusFields {
        root: FieldPath::new("corpus.root"),
        extensions: FieldPath::new("corpus.extensions"),
        exclude: FieldPath::new("corpus.exclude"),
    };

    /// Check `path` has one of the configured extensions (case-insensitive).
    pub fn is_document(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Check a directory name is excluded.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|e| e == name)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.is_empty() {
            diag.error(Self::FIELDS.extensions, "no document extensions configured");
        }
        for ext in &self.extensions {
            if ext.is_empty() || ext.starts_with('.') {
                diag.error_with_hint(
                    Self::FIELDS.extensions,
                    format!("invalid extension `{ext}`"),
                    "write extensions without the leading dot, e.g. \"html\"",
                );
            }
        }
        if self.exclude.iter().any(|e| e.contains(['/', '\\'])) {
            diag.error(
                Self::FIELDS.exclude,
                format!("{} takes directory names, not paths", Self::FIELDS.exclude),
            );
        }

        if !self.root.exists() {
            diag.error(
                Self::FIELDS.root,
                format!("directory not found: {}", self.root.display()),
            );
        } else if !self.root.is_dir() {
            diag.error(
                Self::FIELDS.root,
                format!("not a directory: {}", self.root.display()),
            );
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: ".".into(),
            extensions: vec!["html".into(), "htm".into()],
            exclude: vec![".git".into(), "node_modules".into()],
            parallel: false,
        }
    }
}
