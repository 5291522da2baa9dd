//! Command-line interface definitions.

use crate::config::Delivery;
use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Replace the Tailwind Play CDN with a precompiled stylesheet across a static site
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "stylebake.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default config file
    #[command(visible_alias = "i")]
    Init {
        /// Directory to create the config in (default: current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,

        /// Print the config to stdout instead of writing it
        #[arg(long)]
        dry: bool,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Rewrite documents in place
    #[command(visible_alias = "r")]
    Run {
        #[command(flatten)]
        args: RewriteArgs,
    },

    /// Report documents that would change, without writing
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: RewriteArgs,
    },
}

/// Shared arguments for Run and Check
#[derive(clap::Args, Debug, Clone)]
pub struct RewriteArgs {
    /// Directory containing the documents (overrides `corpus.root`)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Stylesheet delivery mode
    #[arg(short, long, value_enum)]
    pub delivery: Option<Delivery>,

    /// Compiled stylesheet path (overrides `stylesheet.output`)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub stylesheet: Option<PathBuf>,

    /// Fixed href for linked delivery
    #[arg(long)]
    pub href: Option<String>,

    /// Run the stylesheet compiler before rewriting
    #[arg(short = 'P', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub compile: Option<bool>,

    /// Strip comments and blank lines
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Add `defer` to external scripts
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub defer: Option<bool>,

    /// Load font stylesheets asynchronously
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub async_fonts: Option<bool>,

    /// Add preconnect hints for media hosts
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub preconnect: Option<bool>,

    /// Process documents in parallel
    #[arg(short = 'j', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub parallel: Option<bool>,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// How the run summary is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored text on stderr
    #[default]
    Text,
    /// JSON on stdout
    Json,
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }

    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check { .. })
    }

    /// Arguments of Run or Check.
    pub fn rewrite_args(&self) -> Option<&RewriteArgs> {
        match &self.command {
            Commands::Run { args } | Commands::Check { args } => Some(args),
            Commands::Init { .. } => None,
        }
    }
}
