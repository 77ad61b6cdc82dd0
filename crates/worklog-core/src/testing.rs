//! Test doubles shared by this crate's tests and downstream crates
//! (enable the `testing` feature).

use crate::model::LanguageModel;
use async_trait::async_trait;
use llm_gateway::{GatewayError, Prompt};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A well-formed 46-character key.
pub const VALID_KEY: &str = "sk-test0123456789abcdefghijklmnopqrstuvwxyzABC";

/// A [`LanguageModel`] that replays queued replies and records every prompt.
/// Once the queue is empty it answers with a provider error.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    pub fn fail(self, err: GatewayError) -> Self {
        self.push(Err(err));
        self
    }

    pub fn push(&self, reply: Result<String, GatewayError>) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.prompts().pop()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &Prompt) -> Result<String, GatewayError> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.clone());
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                Err(GatewayError::Provider {
                    status: None,
                    message: "scripted model has no reply queued".into(),
                })
            })
    }
}
