//! Config subcommands handler

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use shellscope::theme::current_theme;
use shellscope::Config;

use super::load_config;

fn resolve_path(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Config::config_path()?),
    }
}

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    let theme = current_theme();
    println!("{}", theme.primary_text(&toml_str));
    Ok(())
}

/// Print the config file path.
#[cfg(not(tarpaulin_include))]
pub fn handle_path(config_path: Option<&Path>) -> Result<()> {
    println!("{}", resolve_path(config_path)?.display());
    Ok(())
}

/// Write the default configuration, refusing to clobber an existing file.
#[cfg(not(tarpaulin_include))]
pub fn handle_init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = resolve_path(config_path)?;
    if path.exists() && !force {
        bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(&path)?;
    let theme = current_theme();
    println!("{} {}", theme.success_text("Wrote"), path.display());
    Ok(())
}
