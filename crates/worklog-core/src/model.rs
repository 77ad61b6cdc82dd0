use crate::vault::CredentialVault;
use async_trait::async_trait;
use llm_gateway::{ChatClient, GatewayError, Prompt};
use std::sync::Arc;

/// Text generation as the organizer and synthesizer see it.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, GatewayError>;
}

/// [`ChatClient`] bound to a credential vault. The key is loaded for each
/// call and dropped when the call returns.
pub struct VaultModel {
    client: ChatClient,
    vault: Arc<dyn CredentialVault>,
}

impl VaultModel {
    pub fn new(client: ChatClient, vault: Arc<dyn CredentialVault>) -> Self {
        Self { client, vault }
    }
}

#[async_trait]
impl LanguageModel for VaultModel {
    async fn complete(&self, prompt: &Prompt) -> Result<String, GatewayError> {
        let credential = self
            .vault
            .load()
            .ok_or_else(|| GatewayError::Unauthorized("no API key configured".into()))?;
        self.client.complete(credential.expose(), prompt).await
    }
}
