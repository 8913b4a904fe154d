//! Clean command handler

use std::path::Path;

use anyhow::{Context, Result};
use humansize::{format_size, BINARY};

use shellscope::cli::CleanArgs;
use shellscope::theme::current_theme;
use shellscope::transcript::sanitize;

use super::load_config;

/// Sanitize the raw session log into the clean transcript.
#[cfg(not(tarpaulin_include))]
pub fn handle(config_path: Option<&Path>, args: CleanArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let raw = args.raw.unwrap_or(config.transcript.raw_path);
    let clean = args.out.unwrap_or(config.transcript.clean_path);

    let stats = sanitize(&raw, &clean)
        .with_context(|| format!("Failed to clean {}", raw.display()))?;

    let theme = current_theme();
    println!(
        "{} {} -> {}",
        theme.success_text("Cleaned"),
        raw.display(),
        clean.display()
    );
    println!(
        "{}",
        theme.secondary_text(&format!(
            "  {} in, {} out, {} removed",
            format_size(stats.raw_bytes as u64, BINARY),
            format_size(stats.clean_bytes as u64, BINARY),
            format_size(stats.removed_bytes() as u64, BINARY),
        ))
    );
    Ok(())
}
