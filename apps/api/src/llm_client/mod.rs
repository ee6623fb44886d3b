/// LLM Client — the single point of entry for hosted-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the model API directly.
/// Scorers reach it through the `ModelInvoker` trait so tests can script replies.
///
/// The client makes exactly one HTTP attempt per call. Retry and backoff belong
/// to the caller (`ExternalScorer`), which sees rate limiting as `ModelOutcome::RateLimited`.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::scoring::external::{ModelInvoker, ModelOutcome};

const COHERE_CHAT_URL: &str = "https://api.cohere.com/v1/chat";
pub const MODEL: &str = "command-r-plus";
const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.6;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    message: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Thin wrapper over the Cohere chat API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Self::with_endpoint(api_key, COHERE_CHAT_URL.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            endpoint,
        })
    }

    /// Makes a single chat call and returns the reply text.
    /// A 429 surfaces as `Ok(None)` so the caller can decide whether to back off.
    pub async fn chat(&self, prompt: &str) -> Result<Option<String>, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            message: prompt,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: parse_error_message(body),
            });
        }

        let body = response.text().await?;
        let chat: ChatResponse = serde_json::from_str(&body)?;

        debug!("LLM call succeeded: reply_chars={}", chat.text.len());

        Ok(Some(chat.text))
    }
}

#[async_trait]
impl ModelInvoker for LlmClient {
    async fn invoke(&self, prompt: &str) -> ModelOutcome {
        match self.chat(prompt).await {
            Ok(Some(text)) => ModelOutcome::Success(text),
            Ok(None) => ModelOutcome::RateLimited,
            Err(e) => ModelOutcome::Fatal(e),
        }
    }
}

/// Pulls `message` out of a JSON error body, falling back to the raw body.
fn parse_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body)
}
