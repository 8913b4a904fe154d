//! Command-line interface definition.
//!
//! Lives in the library so the xtask crate can render man pages from it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(name = "shellscope")]
#[command(version)]
#[command(about = "Security analysis of terminal tool output with a hosted LLM")]
#[command(
    long_about = "Shellscope reads the log of a recorded terminal session, extracts the \
last command you ran together with its output, and asks a language model for a \
security assessment. It can also answer follow-up questions and serve the same \
features over HTTP."
)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Strip terminal control sequences from a raw session log
    Clean(CleanArgs),

    /// Show the last command and its output from a cleaned log
    Last(LastArgs),

    /// Clean the session log and analyze the last command with the model
    Analyze(AnalyzeArgs),

    /// Ask the model a single question
    Ask(AskArgs),

    /// Interactive chat with conversation memory
    Chat(ChatArgs),

    /// Run the HTTP API
    Serve(ServeArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sampling overrides shared by model-backed commands.
#[derive(Debug, Clone, Default, Args)]
pub struct SamplingArgs {
    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum tokens in the reply
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Raw session log (defaults to transcript.raw_path)
    #[arg(long, value_name = "FILE")]
    pub raw: Option<PathBuf>,

    /// Where to write the cleaned log (defaults to transcript.clean_path)
    #[arg(long, short, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct LastArgs {
    /// Cleaned session log (defaults to transcript.clean_path)
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Raw session log (defaults to transcript.raw_path)
    #[arg(long, value_name = "FILE")]
    pub raw: Option<PathBuf>,

    /// Where to write the cleaned log (defaults to transcript.clean_path)
    #[arg(long, value_name = "FILE")]
    pub clean: Option<PathBuf>,

    #[command(flatten)]
    pub sampling: SamplingArgs,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    /// Question for the model
    #[arg(required = true)]
    pub prompt: Vec<String>,

    #[command(flatten)]
    pub sampling: SamplingArgs,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Analyze the last command before starting the chat
    #[arg(long)]
    pub analyze: bool,

    /// Write a Markdown report of the conversation on exit
    #[arg(long)]
    pub report: bool,

    #[command(flatten)]
    pub sampling: SamplingArgs,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind (defaults to server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to server.port)
    #[arg(long, short)]
    pub port: Option<u16>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Write the default configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
