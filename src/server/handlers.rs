//! Route handlers.

use axum::extract::State;
use chrono::Local;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ApiError, AppState};
use crate::report;

/// Number of characters of the model's reply echoed by `/health`.
const HEALTH_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Analyze request. Without `tool_output` the terminal transcript is used.
#[derive(Debug, Default, Deserialize)]
pub struct ToolAnalysisRequest {
    #[serde(default)]
    pub tool_output: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LlmResponse {
    pub response: String,
    /// Command that was analyzed, when it came from the transcript
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub message: String,
    pub path: String,
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Security Analysis LLM API is running" }))
}

pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<LlmResponse>, ApiError> {
    let params = state
        .defaults
        .with_overrides(request.temperature, request.max_tokens);

    let response = state
        .assistant
        .respond(&state.conversation, &request.prompt, &params)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "generate failed");
            ApiError::internal(format!("Error generating response: {err}"))
        })?;

    Ok(Json(LlmResponse {
        response,
        command: None,
    }))
}

pub async fn analyze_tool(
    State(state): State<AppState>,
    Json(request): Json<ToolAnalysisRequest>,
) -> Result<Json<LlmResponse>, ApiError> {
    let params = state
        .defaults
        .with_overrides(request.temperature, request.max_tokens);

    let pasted = request
        .tool_output
        .as_deref()
        .filter(|output| !output.trim().is_empty());

    if let Some(output) = pasted {
        let tool_name = request.tool_name.as_deref().unwrap_or("unknown");
        let response = state
            .assistant
            .analyze_output(&state.conversation, tool_name, output, &params)
            .await
            .map_err(|err| ApiError::internal(format!("Error analyzing tool output: {err}")))?;
        return Ok(Json(LlmResponse {
            response,
            command: None,
        }));
    }

    let analysis = state
        .assistant
        .analyze_last(&state.conversation, &state.transcript, &params)
        .await?;

    Ok(Json(LlmResponse {
        response: analysis.response,
        command: Some(analysis.record.command),
    }))
}

pub async fn clear_history(State(state): State<AppState>) -> Json<Value> {
    state.conversation.lock().clear();
    tracing::info!("conversation history cleared");
    Json(json!({ "message": "Conversation history cleared" }))
}

pub async fn generate_report(
    State(state): State<AppState>,
) -> Result<Json<ReportResponse>, ApiError> {
    let conversation = state.conversation.lock().clone();

    let path = report::write_report(&state.report_dir, &state.report_name, &conversation)
        .map_err(|err| {
            tracing::error!(error = %err, "report generation failed");
            ApiError::internal(format!("Error generating report: {err}"))
        })?;

    state.set_last_report(path.clone());
    Ok(Json(ReportResponse {
        message: "Report generated successfully".to_string(),
        path: path.display().to_string(),
    }))
}

pub async fn download_report(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "Report file not found. Generate a report first.";

    let path = state
        .last_report()
        .or_else(|| {
            let name = state.report_name.render(Local::now()).ok()?;
            Some(state.report_dir.join(name))
        })
        .ok_or_else(|| ApiError::not_found(MISSING))?;
    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::not_found(MISSING));
        }
        Err(err) => return Err(ApiError::internal(format!("Error downloading report: {err}"))),
    };

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report.md".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        content,
    ))
}

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let reply = state
        .assistant
        .health_check()
        .await
        .map_err(|err| ApiError::unavailable(format!("LLM not available: {err}")))?;

    let preview: String = reply.chars().take(HEALTH_PREVIEW_CHARS).collect();
    Ok(Json(json!({
        "status": "healthy",
        "llm_response": format!("{preview}..."),
    })))
}
