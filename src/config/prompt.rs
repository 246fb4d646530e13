use crate::error::ConfigError;
use log::{ info, warn };
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Background text handed to every response request. Loaded once at startup
/// and never modified afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PromptContext {
    text: Arc<str>,
}

impl PromptContext {
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self { text: Arc::from(text) }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for PromptContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Reads the raw prompt text from a local path or an `http(s)://` URL.
pub async fn read_prompt_source(source: &str) -> Result<String, ConfigError> {
    if is_remote(source) {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::PromptFetch { url: source.to_string(), source: e })?;
        let resp = client
            .get(source)
            .send().await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ConfigError::PromptFetch { url: source.to_string(), source: e })?;
        resp.text().await.map_err(|e| ConfigError::PromptFetch { url: source.to_string(), source: e })
    } else {
        tokio::fs
            ::read_to_string(source).await
            .map_err(|e| ConfigError::PromptIo { path: source.to_string(), source: e })
    }
}

/// Loads the prompt context, falling back to an empty one when the source is
/// missing or unreadable.
pub async fn load_prompt_context(source: &str) -> PromptContext {
    if source.trim().is_empty() {
        info!("No prompt source configured; using empty prompt context");
        return PromptContext::default();
    }
    match read_prompt_source(source).await {
        Ok(text) => {
            info!("Loaded prompt context from {} ({} bytes)", source, text.len());
            PromptContext::new(text)
        }
        Err(e) => {
            warn!("Prompt context unavailable, continuing without it: {}", e);
            PromptContext::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn loads_file_contents_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "You are helpful.\nBe brief.").unwrap();
        let context = load_prompt_context(file.path().to_str().unwrap()).await;
        assert_eq!(context.as_str(), "You are helpful.\nBe brief.");
    }

    #[tokio::test]
    async fn missing_file_yields_empty_context() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("prompt.txt");
        let context = load_prompt_context(missing.to_str().unwrap()).await;
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn read_reports_missing_file() {
        let err = read_prompt_source("/definitely/not/here/prompt.txt").await.unwrap_err();
        assert!(matches!(err, ConfigError::PromptIo { .. }));
    }
}
