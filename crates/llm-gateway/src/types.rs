use serde::{Deserialize, Serialize};
use std::time::Duration;

// ─── Prompt ───────────────────────────────────────────────────────────────

/// A single-shot prompt: standing instructions, supporting material, and the
/// concrete task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub context: String,
    pub task: String,
}

impl Prompt {
    pub fn new(
        system: impl Into<String>,
        context: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            system: system.into(),
            context: context.into(),
            task: task.into(),
        }
    }

    /// Render as a system message plus one user message carrying the context
    /// followed by the task. Empty parts are skipped.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if !self.system.trim().is_empty() {
            messages.push(ChatMessage {
                role: Role::System,
                content: self.system.trim().to_string(),
            });
        }
        let user = [self.context.trim(), self.task.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        messages.push(ChatMessage {
            role: Role::User,
            content: user,
        });
        messages
    }

    /// Total character count across all parts, for logging.
    pub fn len(&self) -> usize {
        self.system.len() + self.context.len() + self.task.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    /// `null` when the provider refused or filtered the completion.
    #[serde(default)]
    pub content: Option<String>,
}

/// Error envelope returned alongside non-2xx statuses:
/// `{"error": {"message": "...", "type": "...", "code": "..."}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

// ─── ClientConfig ─────────────────────────────────────────────────────────

/// Connection and sampling settings for [`crate::ChatClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root without the trailing `/chat/completions`.
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Upper bound on one full request/response round-trip.
    pub timeout: Duration,
}

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
