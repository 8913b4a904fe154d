//! Ask command handler

use std::path::Path;

use anyhow::{Context, Result};
use parking_lot::Mutex;

use shellscope::cli::AskArgs;
use shellscope::Conversation;

use super::{build_assistant, load_config, sampling};

/// Send a single question to the model and print the reply.
#[cfg(not(tarpaulin_include))]
pub async fn handle(config_path: Option<&Path>, args: AskArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let params = sampling(&config, &args.sampling);
    let assistant = build_assistant(&config)?;
    let conversation = Mutex::new(Conversation::new());

    let prompt = args.prompt.join(" ");
    let reply = assistant
        .respond(&conversation, &prompt, &params)
        .await
        .context("Error generating response")?;

    println!("{reply}");
    Ok(())
}
