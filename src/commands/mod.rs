//! Subcommand handlers.

pub mod analyze;
pub mod ask;
pub mod chat;
pub mod clean;
pub mod completions;
pub mod config;
pub mod last;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result};

use shellscope::cli::SamplingArgs;
use shellscope::llm::{build_backend, CompletionParams};
use shellscope::{Assistant, Config};

/// Load the config from `--config` when given, otherwise the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    config.context("Failed to load configuration")
}

/// Build the assistant for the configured model backend.
pub fn build_assistant(config: &Config) -> Result<Assistant> {
    let backend = build_backend(&config.llm).context("Failed to set up the model backend")?;
    Ok(Assistant::new(backend))
}

/// Configured sampling defaults with command-line overrides applied.
pub fn sampling(config: &Config, args: &SamplingArgs) -> CompletionParams {
    config
        .llm
        .completion_params()
        .with_overrides(args.temperature, args.max_tokens)
}
