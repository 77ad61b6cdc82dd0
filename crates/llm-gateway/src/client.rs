use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use tracing::debug;

use crate::types::{ChatRequest, ChatResponse, ClientConfig, ErrorEnvelope, Prompt};
use crate::{GatewayError, Result};

/// Longest slice of a raw error body carried into a [`GatewayError`].
const MAX_ERROR_BODY: usize = 300;

// ─── ChatClient ───────────────────────────────────────────────────────────

/// HTTP client for a chat-completions endpoint.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `prompt` and return the text of the first choice.
    ///
    /// `api_key` is only used to build this request's `Authorization` header.
    pub async fn complete(&self, api_key: &str, prompt: &Prompt) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = ChatRequest {
            model: &self.config.model,
            messages: prompt.to_messages(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        debug!(
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = status.as_u16(), "chat completion response");

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, retry_after, &text));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                GatewayError::provider(format!("malformed completion body: {e}"))
            } else {
                transport_error(e)
            }
        })?;
        first_choice_text(parsed)
    }
}

// ─── Internal ─────────────────────────────────────────────────────────────

fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Network("request timed out".into())
    } else if err.is_connect() {
        GatewayError::Network(format!("connection failed: {err}"))
    } else {
        GatewayError::Network(err.to_string())
    }
}

/// Map a non-2xx response to the matching error variant.
pub(crate) fn status_error(
    status: StatusCode,
    retry_after_secs: Option<u64>,
    body: &str,
) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GatewayError::Unauthorized(error_message(status, body))
        }
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited { retry_after_secs },
        _ => GatewayError::Provider {
            status: Some(status.as_u16()),
            message: error_message(status, body),
        },
    }
}

/// Prefer the provider's structured message, then the raw body, then the
/// status reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}

pub(crate) fn first_choice_text(response: ChatResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::provider("response contained no choices"))?;
    choice.message.content.ok_or_else(|| {
        let reason = choice.finish_reason.as_deref().unwrap_or("unknown");
        GatewayError::provider(format!("completion had no content (finish reason: {reason})"))
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────
