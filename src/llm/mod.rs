//! Hosted model backends.
//!
//! Every backend implements [`LlmBackend`]: take an ordered list of chat
//! messages plus sampling parameters and return the model's reply text.
//! The transcript pipeline never touches this module; the assistant layer
//! glues the two together.

mod error;
mod message;
mod openai_compat;

pub use error::{LlmError, LlmResult};
pub use message::{ChatMessage, MessageRole};
pub use openai_compat::{parse_completion, OpenAiCompatBackend};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{LlmConfig, Provider};

/// Sampling parameters for one completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 512,
        }
    }
}

impl CompletionParams {
    /// Override the defaults with whatever the caller supplied.
    pub fn with_overrides(self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        Self {
            temperature: temperature.unwrap_or(self.temperature),
            max_tokens: max_tokens.unwrap_or(self.max_tokens),
        }
    }
}

/// A chat-completion capable model service.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Display name of the backend.
    fn name(&self) -> &str;

    /// Send the conversation and return the reply text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> LlmResult<String>;
}

/// Read an API key from the environment, ignoring empty values.
pub fn api_key_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|key| !key.trim().is_empty())
}

/// Build the backend selected in the configuration.
pub fn build_backend(config: &LlmConfig) -> LlmResult<Arc<dyn LlmBackend>> {
    let provider = config.provider;
    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| provider.default_base_url().to_string());
    let model = config
        .model
        .clone()
        .unwrap_or_else(|| provider.default_model().to_string());
    let key_var = config
        .api_key_env
        .clone()
        .unwrap_or_else(|| provider.default_api_key_env().to_string());
    let timeout = Duration::from_secs(config.timeout_secs);

    let api_key = api_key_from_env(&key_var);
    if api_key.is_none() && provider.requires_api_key() {
        return Err(LlmError::MissingApiKey(key_var));
    }

    tracing::debug!(provider = provider.name(), %base_url, %model, "building llm backend");

    let backend =
        OpenAiCompatBackend::new(provider.name(), base_url, model, api_key, timeout)?;
    Ok(Arc::new(backend))
}
