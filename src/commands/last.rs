//! Last command handler

use std::path::Path;

use anyhow::{bail, Result};
use serde_json::json;

use shellscope::cli::LastArgs;
use shellscope::theme::current_theme;
use shellscope::transcript::{extract_last, Extraction};

use super::load_config;

/// Print the last command record from the clean transcript.
///
/// A missing log is an error. A log without any command is not.
#[cfg(not(tarpaulin_include))]
pub fn handle(config_path: Option<&Path>, args: LastArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let log = args.log.unwrap_or(config.transcript.clean_path);

    let record = match extract_last(&log) {
        Extraction::Found(record) => record,
        Extraction::NoCommand => {
            if args.json {
                println!("{}", json!({ "command": null, "output": null }));
            } else {
                println!("No command found.");
            }
            return Ok(());
        }
        Extraction::NotFound { path } => bail!("Log file not found: {}", path.display()),
    };

    if args.json {
        let value = json!({
            "command": record.command,
            "output": record.output(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let theme = current_theme();
    println!("{} {}", theme.accent_text("Command:"), record.command);
    println!("{}", theme.accent_text("Output:"));
    if record.has_output() {
        println!("{}", record.output());
    } else {
        println!("{}", theme.secondary_text("(no output)"));
    }
    Ok(())
}
