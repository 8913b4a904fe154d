//! Serve command handler

use std::path::Path;

use anyhow::{Context, Result};

use shellscope::cli::ServeArgs;
use shellscope::report::ReportName;
use shellscope::server::{serve, AppState};

use super::{build_assistant, load_config};

/// Run the HTTP API until Ctrl-C.
#[cfg(not(tarpaulin_include))]
pub async fn handle(config_path: Option<&Path>, args: ServeArgs) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let assistant = build_assistant(&config)?;
    let report_name = ReportName::parse(&config.report.filename_template)
        .context("Invalid report filename template")?;
    let state = AppState::new(
        assistant,
        config.transcript.paths(),
        config.report.dir.clone(),
        report_name,
        config.llm.completion_params(),
    );

    let addr = config.server.bind_address();
    serve(state, &addr)
        .await
        .with_context(|| format!("Server on {addr} failed"))
}
