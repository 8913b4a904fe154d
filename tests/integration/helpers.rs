//! Shared helpers for integration tests

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;

use shellscope::llm::{ChatMessage, CompletionParams, LlmBackend, LlmError, LlmResult};

/// Directory holding the test fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Read a fixture file as raw bytes.
pub fn load_fixture(name: &str) -> Vec<u8> {
    fs::read(fixtures_dir().join(name)).expect("Failed to read fixture")
}

/// Copy a fixture into `dir` under `dest_name` and return the new path.
pub fn copy_fixture(dir: &Path, name: &str, dest_name: &str) -> PathBuf {
    let dest = dir.join(dest_name);
    fs::write(&dest, load_fixture(name)).expect("Failed to copy fixture");
    dest
}

/// Run the shellscope binary in `workdir` with an isolated config.
///
/// Returns (stdout, stderr, exit code).
pub fn run_shellscope(workdir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_shellscope"))
        .args(args)
        .current_dir(workdir)
        .env("NO_COLOR", "1")
        .env("SHELLSCOPE_CONFIG", workdir.join("missing-config.toml"))
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute shellscope");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

/// Create an empty temporary working directory.
pub fn temp_workdir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Backend returning queued replies and recording every request.
///
/// When the queue runs dry it echoes the last user message.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<LlmResult<String>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_replies(replies: &[&str]) -> Arc<Self> {
        let backend = Self::default();
        backend
            .replies
            .lock()
            .extend(replies.iter().map(|reply| Ok(reply.to_string())));
        Arc::new(backend)
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        _params: &CompletionParams,
    ) -> LlmResult<String> {
        self.requests.lock().push(messages.to_vec());
        if let Some(reply) = self.replies.lock().pop_front() {
            return reply;
        }
        let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(format!("echo: {last}"))
    }
}

/// Backend whose every call fails as if the model service were down.
pub struct FailingBackend;

impl FailingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl LlmBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _params: &CompletionParams,
    ) -> LlmResult<String> {
        Err(LlmError::Status {
            status: 503,
            body: "model offline".to_string(),
        })
    }
}
