//! `[stylesheet]` section: the precompiled artifact and how it reaches documents.
//!
//! # Example
//!
//! ```toml
//! [stylesheet]
//! delivery = "linked"
//! output = "assets/css/styles.css"
//! href = "/assets/css/styles.css"
//!
//! [stylesheet.compiler]
//! enable = true
//! command = ["npx", "tailwindcss"]
//! input = "input.css"
//! # Runs: npx tailwindcss -i input.css -o assets/css/styles.css --minify
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the stylesheet is placed into each document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    /// Embed the full text in a `<style>` block.
    #[default]
    Inline,
    /// Reference the output file with a `<link>`.
    Linked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesheetConfig {
    pub delivery: Delivery,
    /// Compiled stylesheet, relative to the config file.
    pub output: PathBuf,
    /// Fixed href for linked delivery. Relative to each document when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub compiler: CompilerConfig,
}

pub struct StylesheetFields {
    pub output: FieldPath,
    pub href: FieldPath,
}

impl StylesheetConfig {
    pub const FIELDS: StylesheetFields = StylesheetFields {
        output: FieldPath::new("stylesheet.output"),
        href: FieldPath::new("stylesheet.href"),
    };

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.output.as_os_str().is_empty() {
            diag.error(Self::FIELDS.output, "must not be empty");
        } else if self.output.is_dir() {
            diag.error(
                Self::FIELDS.output,
                format!("is a directory: {}", self.output.display()),
            );
        }

        if let Some(href) = &self.href {
            if href.trim().is_empty() || href.contains(['"', '<', '>']) {
                diag.error(Self::FIELDS.href, format!("invalid href `{href}`"));
            }
            if self.delivery == Delivery::Inline {
                diag.warn(Self::FIELDS.href, "ignored with inline delivery");
            }
        }

        self.compiler.validate(diag);
    }
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            delivery: Delivery::Inline,
            output: "assets/css/styles.css".into(),
            href: None,
            compiler: CompilerConfig::default(),
        }
    }
}

// ============================================================================
// [stylesheet.compiler]
// ============================================================================

/// Compiler run once before the corpus is processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub enable: bool,
    /// Compiler command (e.g., `["tailwindcss"]` or `["npx", "tailwindcss"]`).
    pub command: Vec<String>,
    /// Input CSS file.
    pub input: PathBuf,
    /// Optional `-c` config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,
    /// Pass `--minify`.
    pub minify: bool,
}

pub struct CompilerFields {
    pub enable: FieldPath,
    pub command: FieldPath,
    pub input: FieldPath,
    pub config: FieldPath,
}

impl CompilerConfig {
    pub const FIELDS: CompilerFields = CompilerFields {
        enable: FieldPath::new("stylesheet.compiler.enable"),
        command: FieldPath::new("stylesheet.compiler.command"),
        input: FieldPath::new("stylesheet.compiler.input"),
        config: FieldPath::new("stylesheet.compiler.config"),
    };

    /// # Checks
    /// - If enabled:
    ///   - `command` must not be empty
    ///   - `command[0]` must be an installed executable (or package runner)
    ///   - `input` and `config` must point to existing files
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }

        let Some(cmd) = self.command.first() else {
            diag.error(
                Self::FIELDS.command,
                format!(
                    "{} is true but {} is empty",
                    Self::FIELDS.enable,
                    Self::FIELDS.command
                ),
            );
            return;
        };

        let is_package_runner = ["npx", "bunx", "pnpx", "yarn", "dlx"].contains(&cmd.as_str());
        if which::which(cmd).is_err() {
            if is_package_runner {
                if let Some(package) = self.command.get(1) {
                    diag.hint(
                        Self::FIELDS.command,
                        format!("`{package}` via `{cmd}`, make sure the package is installed"),
                    );
                }
            } else {
                diag.error_with_hint(
                    Self::FIELDS.command,
                    format!("`{cmd}` not found"),
                    format!("install the command or update {}", Self::FIELDS.command),
                );
            }
        }

        if !self.input.is_file() {
            diag.error(
                Self::FIELDS.input,
                format!("file not found: {}", self.input.display()),
            );
        }

        if let Some(config) = &self.config
            && !config.is_file()
        {
            diag.error(
                Self::FIELDS.config,
                format!("file not found: {}", config.display()),
            );
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            enable: false,
            command: vec!["tailwindcss".into()],
            input: "input.css".into(),
            config: None,
            minify: true,
        }
    }
}
