//! Integration tests for the HTTP API

use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use shellscope::llm::{CompletionParams, LlmBackend, MessageRole};
use shellscope::report::ReportName;
use shellscope::server::{create_router, AppState};
use shellscope::{Assistant, TranscriptPaths};

use crate::helpers::{copy_fixture, FailingBackend, ScriptedBackend};

fn app_state(dir: &Path, backend: Arc<dyn LlmBackend>) -> AppState {
    AppState::new(
        Assistant::new(backend),
        TranscriptPaths::new(dir.join("live-session.log"), dir.join("cleaned-session.log")),
        dir.join("reports"),
        ReportName::parse("chat_report").unwrap(),
        CompletionParams::default(),
    )
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn root_reports_running() {
    let temp = TempDir::new().unwrap();
    let app = create_router(app_state(temp.path(), ScriptedBackend::new()));

    let (status, body) = send_json(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Security Analysis LLM API is running");
}

#[tokio::test]
async fn generate_carries_history_between_requests() {
    let temp = TempDir::new().unwrap();
    let backend = ScriptedBackend::with_replies(&["first answer", "second answer"]);
    let state = app_state(temp.path(), backend.clone());
    let app = create_router(state.clone());

    let (status, body) = send_json(&app, "POST", "/generate", Some(json!({ "prompt": "what is smb?" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "first answer" }));

    let (_, body) = send_json(&app, "POST", "/generate", Some(json!({ "prompt": "and port 445?" }))).await;
    assert_eq!(body["response"], "second answer");

    let requests = backend.requests();
    let second = &requests[1];
    let roles: Vec<MessageRole> = second.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            MessageRole::System,
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::User
        ]
    );
    assert_eq!(second[1].content, "what is smb?");
    assert_eq!(second[2].content, "first answer");
    assert_eq!(state.conversation.lock().len(), 4);
}

#[tokio::test]
async fn generate_failure_is_internal_error() {
    let temp = TempDir::new().unwrap();
    let state = app_state(temp.path(), FailingBackend::new());
    let app = create_router(state.clone());

    let (status, body) = send_json(&app, "POST", "/generate", Some(json!({ "prompt": "hi" }))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Error generating response:"));
    assert!(state.conversation.lock().is_empty());
}

#[tokio::test]
async fn generate_without_prompt_is_rejected() {
    let temp = TempDir::new().unwrap();
    let app = create_router(app_state(temp.path(), ScriptedBackend::new()));

    let (status, _) = send(&app, "POST", "/generate", Some(json!({ "temperature": 0.2 }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn analyze_tool_uses_last_transcript_command() {
    let temp = TempDir::new().unwrap();
    copy_fixture(temp.path(), "nmap_session.log", "live-session.log");
    let backend = ScriptedBackend::with_replies(&["Risk Level: Low"]);
    let app = create_router(app_state(temp.path(), backend.clone()));

    let (status, body) = send_json(&app, "POST", "/analyze-tool", Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Risk Level: Low");
    assert_eq!(body["command"], "whoami");
    assert!(temp.path().join("cleaned-session.log").exists());

    let request = &backend.requests()[0];
    let prompt = &request.last().unwrap().content;
    assert!(prompt.contains("Tool: whoami"));
    assert!(prompt.contains("Output: root"));
}

#[tokio::test]
async fn analyze_tool_without_raw_log_is_bad_request() {
    let temp = TempDir::new().unwrap();
    let backend = ScriptedBackend::new();
    let app = create_router(app_state(temp.path(), backend.clone()));

    let (status, body) = send_json(&app, "POST", "/analyze-tool", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Raw session log not found"));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn analyze_tool_without_command_is_bad_request() {
    let temp = TempDir::new().unwrap();
    copy_fixture(temp.path(), "no_commands.log", "live-session.log");
    let app = create_router(app_state(temp.path(), ScriptedBackend::new()));

    let (status, body) = send_json(&app, "POST", "/analyze-tool", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().starts_with("No command found"));
}

#[tokio::test]
async fn analyze_tool_prefers_pasted_output() {
    let temp = TempDir::new().unwrap();
    let backend = ScriptedBackend::with_replies(&["looks like a default page"]);
    let app = create_router(app_state(temp.path(), backend.clone()));

    let (status, body) = send_json(
        &app,
        "POST",
        "/analyze-tool",
        Some(json!({ "tool_name": "nikto", "tool_output": "+ Server: Apache/2.4.52" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "looks like a default page" }));
    let requests = backend.requests();
    let prompt = &requests[0].last().unwrap().content;
    assert!(prompt.contains("nikto"));
    assert!(prompt.contains("+ Server: Apache/2.4.52"));
}

#[tokio::test]
async fn clear_history_empties_conversation() {
    let temp = TempDir::new().unwrap();
    let state = app_state(temp.path(), ScriptedBackend::new());
    let app = create_router(state.clone());

    send(&app, "POST", "/generate", Some(json!({ "prompt": "hello" }))).await;
    assert_eq!(state.conversation.lock().len(), 2);

    let (status, body) = send_json(&app, "POST", "/clear-history", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Conversation history cleared");
    assert!(state.conversation.lock().is_empty());
}

#[tokio::test]
async fn download_before_generate_is_not_found() {
    let temp = TempDir::new().unwrap();
    let app = create_router(app_state(temp.path(), ScriptedBackend::new()));

    let (status, body) = send_json(&app, "GET", "/download-report", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Report file not found. Generate a report first.");
}

#[tokio::test]
async fn report_from_earlier_run_is_downloadable() {
    let temp = TempDir::new().unwrap();
    let reports = temp.path().join("reports");
    std::fs::create_dir_all(&reports).unwrap();
    std::fs::write(reports.join("chat_report.md"), "# CyberSecurity AI Chat Report\n").unwrap();
    let app = create_router(app_state(temp.path(), ScriptedBackend::new()));

    let (status, bytes) = send(&app, "GET", "/download-report", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"# CyberSecurity AI Chat Report\n");
}

#[tokio::test]
async fn generated_report_can_be_downloaded() {
    let temp = TempDir::new().unwrap();
    let backend = ScriptedBackend::with_replies(&["Use smbclient -L."]);
    let state = app_state(temp.path(), backend);
    let app = create_router(state.clone());

    send(&app, "POST", "/generate", Some(json!({ "prompt": "enumerate shares?" }))).await;

    let (status, body) = send_json(&app, "POST", "/generate-report", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Report generated successfully");
    let path = state.last_report().unwrap();
    assert_eq!(body["path"], path.display().to_string());
    assert_eq!(path, temp.path().join("reports").join("chat_report.md"));

    let request = Request::builder()
        .uri("/download-report")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/markdown"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"chat_report.md\""
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let markdown = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(markdown.starts_with("# CyberSecurity AI Chat Report"));
    assert!(markdown.contains("enumerate shares?"));
    assert!(markdown.contains("Use smbclient -L."));
}

#[tokio::test]
async fn health_truncates_model_reply() {
    let temp = TempDir::new().unwrap();
    let reply = "Yes, I am working and ready to help with your security assessment today.";
    let state = app_state(temp.path(), ScriptedBackend::with_replies(&[reply]));
    let app = create_router(state.clone());

    let (status, body) = send_json(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    let expected: String = reply.chars().take(50).collect();
    assert_eq!(body["llm_response"], format!("{expected}..."));
    assert!(state.conversation.lock().is_empty());
}

#[tokio::test]
async fn health_reports_unavailable_model() {
    let temp = TempDir::new().unwrap();
    let app = create_router(app_state(temp.path(), FailingBackend::new()));

    let (status, body) = send_json(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["detail"].as_str().unwrap().starts_with("LLM not available:"));
}
