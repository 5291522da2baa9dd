//! Configuration management for `stylebake.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── corpus     # [corpus]
//! │   ├── patterns   # [patterns]
//! │   ├── preconnect # [preconnect]
//! │   ├── rewrite    # [rewrite]
//! │   └── stylesheet # [stylesheet], [stylesheet.compiler]
//! ├── types/         # ConfigError, diagnostics, field paths
//! └── mod.rs         # BakeConfig (this file)
//! ```
//!
//! The config file is optional. Without one, defaults apply and paths are
//! resolved against the current directory. CLI flags override file values.
//! The loaded value is immutable and passed explicitly to the pipeline and
//! the corpus driver.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    CompilerConfig, CorpusConfig, Delivery, PatternsConfig, PreconnectConfig, RewriteConfig,
    StylesheetConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, RewriteArgs},
    debug, log,
    utils::path::{expand_path, normalize_path},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing stylebake.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BakeConfig {
    /// Absolute path to the config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Base for relative paths: the config file's directory, or cwd
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub corpus: CorpusConfig,

    #[serde(default)]
    pub stylesheet: StylesheetConfig,

    #[serde(default)]
    pub rewrite: RewriteConfig,

    #[serde(default)]
    pub patterns: PatternsConfig,

    #[serde(default)]
    pub preconnect: PreconnectConfig,
}

impl BakeConfig {
    /// Load configuration for a Run or Check command.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(cli, &cwd)
    }

    fn load_from(cli: &Cli, cwd: &Path) -> Result<Self> {
        let (mut config, root) = match find_config_file(cwd, &cli.config) {
            Some(path) => {
                let path = normalize_path(&path);
                debug!("config"; "using {}", path.display());
                let mut config = Self::from_path(&path)?;
                let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                (config, root)
            }
            None => {
                debug!("config"; "no {} found, using defaults", cli.config.display());
                (Self::default(), cwd.to_path_buf())
            }
        };

        config.finalize(&root, cwd, cli.rewrite_args());
        config.validate()?;
        Ok(config)
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, root: &Path, cwd: &Path, args: Option<&RewriteArgs>) {
        self.root = normalize_path(root);
        self.normalize_paths();
        if let Some(args) = args {
            self.apply_command_options(args, cwd);
        }
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Path relative to the project root, for display.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply Run/Check arguments. CLI paths are relative to `cwd`.
    fn apply_command_options(&mut self, args: &RewriteArgs, cwd: &Path) {
        crate::logger::set_verbose(args.verbose);

        if let Some(root) = &args.root {
            self.corpus.root = expand_path(root, cwd);
        }
        if let Some(stylesheet) = &args.stylesheet {
            self.stylesheet.output = expand_path(stylesheet, cwd);
        }
        if args.href.is_some() {
            self.stylesheet.href = args.href.clone();
        }

        Self::update_option(&mut self.stylesheet.delivery, args.delivery.as_ref());
        Self::update_option(&mut self.stylesheet.compiler.enable, args.compile.as_ref());
        Self::update_option(&mut self.rewrite.minify, args.minify.as_ref());
        Self::update_option(&mut self.rewrite.defer_scripts, args.defer.as_ref());
        Self::update_option(&mut self.rewrite.async_fonts, args.async_fonts.as_ref());
        Self::update_option(&mut self.rewrite.preconnect, args.preconnect.as_ref());
        Self::update_option(&mut self.corpus.parallel, args.parallel.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve every configured path against the project root.
    fn normalize_paths(&mut self) {
        let root = self.root.clone();

        self.corpus.root = expand_path(&self.corpus.root, &root);
        self.stylesheet.output = expand_path(&self.stylesheet.output, &root);

        let compiler = &mut self.stylesheet.compiler;
        compiler.input = expand_path(&compiler.input, &root);
        if let Some(config) = compiler.config.take() {
            compiler.config = Some(expand_path(&config, &root));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the finalized configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.corpus.validate(&mut diag);
        self.stylesheet.validate(&mut diag);
        self.patterns.validate(&mut diag);
        self.preconnect.validate(&mut diag);

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse a config snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> BakeConfig {
    let (parsed, ignored) = BakeConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
