use async_trait::async_trait;
use super::ResponseProvider;
use crate::error::ProviderError;
use std::time::Duration;

pub const DEFAULT_STUB_DELAY_MS: u64 = 1200;

/// Demo provider: waits a fixed delay, then echoes the message back alongside
/// the prompt context.
#[derive(Debug, Clone)]
pub struct StubProvider {
    delay: Duration,
}

impl StubProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn reply_for(context: &str, user_message: &str) -> String {
        format!("🤖 (Demo) {}\nYou said: \"{}\"", context, user_message)
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_STUB_DELAY_MS))
    }
}

#[async_trait]
impl ResponseProvider for StubProvider {
    async fn respond(&self, context: &str, user_message: &str) -> Result<String, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Self::reply_for(context, user_message))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_context_and_message() {
        let provider = StubProvider::new(Duration::ZERO);
        let reply = provider.respond("C", "hello").await.unwrap();
        assert_eq!(reply, "🤖 (Demo) C\nYou said: \"hello\"");
    }

    #[tokio::test]
    async fn copes_with_empty_context() {
        let provider = StubProvider::new(Duration::ZERO);
        let reply = provider.respond("", "hi there").await.unwrap();
        assert!(reply.contains("You said: \"hi there\""));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_the_configured_delay() {
        let provider = StubProvider::default();
        let started = tokio::time::Instant::now();
        provider.respond("", "x").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(DEFAULT_STUB_DELAY_MS));
    }
}
