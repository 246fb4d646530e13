pub mod ollama;
pub mod stub;

use async_trait::async_trait;
use crate::error::ProviderError;
use super::{ ProviderConfig, ProviderType };
use self::ollama::OllamaClient;
use self::stub::StubProvider;
use std::sync::Arc;

/// Produces the assistant's reply to one user message.
///
/// Implementations resolve exactly once. They are driven inside a spawned task
/// that the caller may abort at any await point, so they must not rely on
/// running to completion.
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    async fn respond(&self, context: &str, user_message: &str) -> Result<String, ProviderError>;

    fn name(&self) -> &str;
}

pub fn new_provider(
    config: &ProviderConfig
) -> Result<Arc<dyn ResponseProvider>, ProviderError> {
    let provider: Arc<dyn ResponseProvider> = match config.provider_type {
        ProviderType::Stub => Arc::new(StubProvider::new(config.stub_delay)),
        ProviderType::Ollama => {
            let specific_client = OllamaClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(provider)
}
