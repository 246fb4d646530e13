pub mod chat;
use crate::error::ConfigError;
use serde::{ Deserialize, Serialize };
use std::str::FromStr;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Stub,
    Ollama,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::Stub => write!(f, "stub"),
            ProviderType::Ollama => write!(f, "ollama"),
        }
    }
}

impl FromStr for ProviderType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stub" | "demo" => Ok(ProviderType::Stub),
            "ollama" => Ok(ProviderType::Ollama),
            _ => Err(ConfigError::InvalidProvider(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider_type: ProviderType,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub stub_delay: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: ProviderType::Stub,
            base_url: None,
            model: None,
            stub_delay: Duration::from_millis(chat::stub::DEFAULT_STUB_DELAY_MS),
        }
    }
}
