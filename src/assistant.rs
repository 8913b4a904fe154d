//! Security assistant: ties the transcript pipeline, conversation memory and
//! a model backend together.
//!
//! Two flows share one conversation:
//! - free-text prompts ([`Assistant::respond`])
//! - "analyze the last thing I ran" ([`Assistant::analyze_last`]), which
//!   cleans the raw terminal log, pulls out the last command and its output,
//!   and asks for a five-part security assessment.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::llm::{ChatMessage, CompletionParams, LlmBackend, LlmError, LlmResult};
use crate::prompt::{self, SYSTEM_PROMPT};
use crate::session::Conversation;
use crate::transcript::{self, CommandRecord, Extraction, TranscriptError, TranscriptPaths};

/// Reasons the analyze flow could not produce an assessment.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Raw session log not found: {path}")]
    RawLogMissing { path: PathBuf },

    #[error(transparent)]
    Transcript(TranscriptError),

    #[error("Log file not found: {path}")]
    LogNotFound { path: PathBuf },

    #[error("No command found in {path}")]
    NoCommand { path: PathBuf },

    #[error("No output captured for last command: {command}")]
    NoOutput { command: String },

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl AnalysisError {
    /// Whether this is a "nothing to analyze yet" condition the caller should
    /// report to the user, as opposed to an internal failure.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::RawLogMissing { .. }
                | Self::LogNotFound { .. }
                | Self::NoCommand { .. }
                | Self::NoOutput { .. }
        )
    }
}

impl From<TranscriptError> for AnalysisError {
    fn from(err: TranscriptError) -> Self {
        let missing = err.is_missing_raw_log();
        match err {
            TranscriptError::Read { path, .. } if missing => Self::RawLogMissing { path },
            other => Self::Transcript(other),
        }
    }
}

/// A completed analysis of the last command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub record: CommandRecord,
    pub response: String,
}

/// Clean the raw log and extract the last command worth analyzing.
pub fn prepare_analysis(paths: &TranscriptPaths) -> Result<CommandRecord, AnalysisError> {
    transcript::sanitize(&paths.raw, &paths.clean)?;

    match transcript::extract_last(&paths.clean) {
        Extraction::Found(record) if record.has_output() => Ok(record),
        Extraction::Found(record) => Err(AnalysisError::NoOutput {
            command: record.command,
        }),
        Extraction::NoCommand => Err(AnalysisError::NoCommand {
            path: paths.clean.clone(),
        }),
        Extraction::NotFound { path } => Err(AnalysisError::LogNotFound { path }),
    }
}

/// Chat front-end over a model backend.
#[derive(Clone)]
pub struct Assistant {
    backend: Arc<dyn LlmBackend>,
    system_prompt: String,
}

impl Assistant {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            backend,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Send `input` with the conversation history and record the exchange.
    ///
    /// The lock is not held while waiting on the model. Nothing is recorded
    /// when the request fails.
    pub async fn respond(
        &self,
        conversation: &Mutex<Conversation>,
        input: &str,
        params: &CompletionParams,
    ) -> LlmResult<String> {
        let messages = conversation.lock().to_messages(&self.system_prompt, input);

        let reply = self.backend.complete(&messages, params).await?;

        conversation.lock().record_exchange(input, reply.as_str());
        Ok(reply)
    }

    /// Analyze the most recent command in the terminal transcript.
    pub async fn analyze_last(
        &self,
        conversation: &Mutex<Conversation>,
        paths: &TranscriptPaths,
        params: &CompletionParams,
    ) -> Result<Analysis, AnalysisError> {
        let record = prepare_analysis(paths)?;
        tracing::info!(command = %record.command, "analyzing last command");

        let request = prompt::analysis_request(&record.command, &record.output());
        let response = self.respond(conversation, &request, params).await?;
        Ok(Analysis { record, response })
    }

    /// Analyze tool output supplied directly by the caller.
    pub async fn analyze_output(
        &self,
        conversation: &Mutex<Conversation>,
        tool_name: &str,
        tool_output: &str,
        params: &CompletionParams,
    ) -> LlmResult<String> {
        let request = prompt::tool_output_request(tool_name, tool_output);
        self.respond(conversation, &request, params).await
    }

    /// Ping the model outside of any conversation.
    pub async fn health_check(&self) -> LlmResult<String> {
        self.backend
            .complete(
                &[ChatMessage::user(prompt::HEALTH_PROBE)],
                &CompletionParams::default(),
            )
            .await
    }
}
