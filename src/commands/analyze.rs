//! Analyze command handler

use std::path::Path;

use anyhow::Result;
use parking_lot::Mutex;

use shellscope::cli::AnalyzeArgs;
use shellscope::theme::current_theme;
use shellscope::transcript::TranscriptPaths;
use shellscope::Conversation;

use super::{build_assistant, load_config, sampling};

/// Clean the session log and analyze the last command.
#[cfg(not(tarpaulin_include))]
pub async fn handle(config_path: Option<&Path>, args: AnalyzeArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let paths = TranscriptPaths::new(
        args.raw.unwrap_or_else(|| config.transcript.raw_path.clone()),
        args.clean.unwrap_or_else(|| config.transcript.clean_path.clone()),
    );
    let params = sampling(&config, &args.sampling);
    let assistant = build_assistant(&config)?;
    let conversation = Mutex::new(Conversation::new());

    let analysis = assistant.analyze_last(&conversation, &paths, &params).await?;

    let theme = current_theme();
    println!("{} {}", theme.accent_text("Command:"), analysis.record.command);
    println!();
    println!("{}", analysis.response);
    Ok(())
}
