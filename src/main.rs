//! Shellscope command-line entry point.

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shellscope::cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.command);

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Clean(args) => commands::clean::handle(config_path, args),
        Commands::Last(args) => commands::last::handle(config_path, args),
        Commands::Analyze(args) => commands::analyze::handle(config_path, args).await,
        Commands::Ask(args) => commands::ask::handle(config_path, args).await,
        Commands::Chat(args) => commands::chat::handle(config_path, args).await,
        Commands::Serve(args) => commands::serve::handle(config_path, args).await,
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(config_path),
            ConfigCommands::Path => commands::config::handle_path(config_path),
            ConfigCommands::Init { force } => commands::config::handle_init(config_path, force),
        },
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}

/// Log to stderr. `RUST_LOG` wins over the per-command default.
fn init_tracing(command: &Commands) {
    let default_level = match command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
