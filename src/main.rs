//! stylebake - replace the Tailwind Play CDN with a precompiled stylesheet.

#![allow(dead_code)]

mod artifact;
mod cli;
mod config;
mod core;
mod corpus;
mod logger;
mod markup;
mod patterns;
mod pipeline;
mod rewrite;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::BakeConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let success = match &cli.command {
        Commands::Init { dir, dry, force } => {
            let dir = match dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir().context("Failed to get current working directory")?,
            };
            cli::init::init_config(&dir, &cli.config, *dry, *force)?;
            true
        }
        Commands::Run { args } | Commands::Check { args } => {
            let config = BakeConfig::load(&cli)?;
            cli::run::run_corpus(&config, args, cli.is_check())?
        }
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}
