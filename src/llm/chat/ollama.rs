use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use async_trait::async_trait;
use super::ResponseProvider;
use crate::error::ProviderError;
use crate::llm::{ ProviderConfig, ProviderType };
use log::debug;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3";

#[derive(Debug)]
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
    completion_model: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

impl OllamaClient {
    pub fn new(base_url: Option<String>, completion_model: Option<String>) -> Self {
        let model = completion_model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into());

        Self {
            http: HttpClient::new(),
            base_url: url,
            completion_model: model,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        if config.provider_type != ProviderType::Ollama {
            return Err(ProviderError::Failed("Invalid config type for OllamaClient".to_string()));
        }

        Ok(Self::new(config.base_url.clone(), config.model.clone()))
    }

    pub fn build_prompt(context: &str, user_message: &str) -> String {
        if context.trim().is_empty() {
            format!("User: {}", user_message)
        } else {
            format!("{}\n\nUser: {}", context, user_message)
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<GenerateResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let req = GenerateRequest {
            model: self.completion_model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };
        debug!("POST {} (model {})", url, self.completion_model);
        let resp = self.http.post(&url).json(&req).send().await?.error_for_status()?;
        let data = resp.json::<GenerateResponse>().await?;
        Ok(data)
    }
}

#[async_trait]
impl ResponseProvider for OllamaClient {
    async fn respond(&self, context: &str, user_message: &str) -> Result<String, ProviderError> {
        let prompt = Self::build_prompt(context, user_message);
        let gen_resp = self.generate(&prompt).await?;
        if gen_resp.response.trim().is_empty() {
            return Err(ProviderError::Failed("model returned an empty response".to_string()));
        }
        Ok(gen_resp.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_places_context_before_user_turn() {
        assert_eq!(OllamaClient::build_prompt("Be nice.", "hi"), "Be nice.\n\nUser: hi");
        assert_eq!(OllamaClient::build_prompt("  ", "hi"), "User: hi");
    }

    #[test]
    fn rejects_mismatched_config() {
        let config = ProviderConfig::default();
        assert!(OllamaClient::from_config(&config).is_err());
    }
}
