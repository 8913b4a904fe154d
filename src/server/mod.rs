//! HTTP API for the security assistant.
//!
//! Exposes the chat and analyze flows to a browser front-end. All requests
//! share one conversation held in [`AppState`]; there is no per-user
//! partitioning.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{GenerateRequest, LlmResponse, ReportResponse, ToolAnalysisRequest};

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use parking_lot::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::assistant::Assistant;
use crate::llm::CompletionParams;
use crate::report::ReportName;
use crate::session::Conversation;
use crate::transcript::TranscriptPaths;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Assistant,
    pub conversation: Arc<Mutex<Conversation>>,
    pub transcript: TranscriptPaths,
    pub report_dir: PathBuf,
    pub report_name: ReportName,
    /// Sampling defaults when a request leaves them out
    pub defaults: CompletionParams,
    last_report: Arc<Mutex<Option<PathBuf>>>,
}

impl AppState {
    pub fn new(
        assistant: Assistant,
        transcript: TranscriptPaths,
        report_dir: PathBuf,
        report_name: ReportName,
        defaults: CompletionParams,
    ) -> Self {
        Self {
            assistant,
            conversation: Arc::new(Mutex::new(Conversation::new())),
            transcript,
            report_dir,
            report_name,
            defaults,
            last_report: Arc::new(Mutex::new(None)),
        }
    }

    /// Path of the report generated by this process, if any.
    pub fn last_report(&self) -> Option<PathBuf> {
        self.last_report.lock().clone()
    }

    fn set_last_report(&self, path: PathBuf) {
        *self.last_report.lock() = Some(path);
    }
}

/// Build the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/generate", post(handlers::generate))
        .route("/analyze-tool", post(handlers::analyze_tool))
        .route("/clear-history", post(handlers::clear_history))
        .route("/generate-report", post(handlers::generate_report))
        .route("/download-report", get(handlers::download_report))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        backend = state.assistant.backend_name(),
        "security analysis API listening"
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
}
