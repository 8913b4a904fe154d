//! OpenAI-compatible chat completions backend.
//!
//! Groq's hosted API and a local LM Studio server both speak the
//! `/chat/completions` dialect, so one client covers them; only the base URL,
//! model and API key differ.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, CompletionParams, LlmBackend, LlmError, LlmResult};

/// Chat completions client for OpenAI-compatible services.
#[derive(Debug, Clone)]
pub struct OpenAiCompatBackend {
    name: String,
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatBackend {
    /// Create a backend for the service at `base_url` (e.g. `https://api.groq.com/openai/v1`).
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            name: name.into(),
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmBackend for OpenAiCompatBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> LlmResult<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: 1.0,
            stream: false,
        };

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!(
            backend = %self.name,
            model = %self.model,
            messages = messages.len(),
            "sending chat completion"
        );

        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                LlmError::Timeout(self.timeout)
            } else {
                LlmError::Http(err)
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            return Err(LlmError::RateLimited { retry_after });
        }

        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(backend = %self.name, status = status.as_u16(), "model service error");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_completion(&text)
    }
}

/// Extract the first choice's message content from a completion response body.
pub fn parse_completion(body: &str) -> LlmResult<String> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|err| LlmError::InvalidResponse(err.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(LlmError::EmptyCompletion)
}
