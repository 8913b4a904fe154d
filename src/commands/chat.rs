//! Chat command handler

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};

use shellscope::cli::ChatArgs;
use shellscope::llm::CompletionParams;
use shellscope::report::{write_report, ReportName};
use shellscope::theme::{current_theme, Theme};
use shellscope::{Assistant, Config, Conversation};

use super::{build_assistant, load_config, sampling};

/// Interactive follow-up loop with conversation memory.
///
/// The prompt is only drawn when stdin is a terminal, so piped input
/// produces clean output.
#[cfg(not(tarpaulin_include))]
pub async fn handle(config_path: Option<&Path>, args: ChatArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let params = sampling(&config, &args.sampling);
    let assistant = build_assistant(&config)?;
    let conversation = Mutex::new(Conversation::new());
    let theme = current_theme();
    let interactive = atty::is(atty::Stream::Stdin);

    if args.analyze {
        analyze_first(&assistant, &conversation, &config, &params, &theme).await?;
    }

    if interactive {
        println!(
            "{}",
            theme.secondary_text("Ask follow-up questions. Type 'exit' or 'quit' to leave.")
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if interactive {
            print!("{} ", theme.accent_text("You:"));
            io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit_command(input) {
            break;
        }

        match assistant.respond(&conversation, input, &params).await {
            Ok(reply) => println!("{} {}\n", theme.success_text("AI:"), reply),
            Err(err) => eprintln!(
                "{}",
                theme.error_text(&format!("Error generating response: {err}"))
            ),
        }
    }

    if args.report {
        let snapshot = conversation.lock().clone();
        if snapshot.is_empty() {
            println!("{}", theme.secondary_text("Nothing to report."));
        } else {
            let name = ReportName::parse(&config.report.filename_template)
                .context("Invalid report filename template")?;
            let path = write_report(&config.report.dir, &name, &snapshot)?;
            println!("{} {}", theme.success_text("Report written to"), path.display());
        }
    }
    Ok(())
}

/// Run the last-command analysis before the chat starts.
///
/// "Nothing to analyze" is a warning here, not a failure.
#[cfg(not(tarpaulin_include))]
async fn analyze_first(
    assistant: &Assistant,
    conversation: &Mutex<Conversation>,
    config: &Config,
    params: &CompletionParams,
    theme: &Theme,
) -> Result<()> {
    match assistant
        .analyze_last(conversation, &config.transcript.paths(), params)
        .await
    {
        Ok(analysis) => {
            println!("{} {}", theme.accent_text("Command:"), analysis.record.command);
            println!();
            println!("{}\n", analysis.response);
        }
        Err(err) if err.is_user_facing() => {
            eprintln!("{}", theme.warning_text(&format!("Skipping analysis: {err}")));
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Whether the input ends the chat loop.
fn is_exit_command(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}
