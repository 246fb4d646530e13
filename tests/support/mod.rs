#![allow(dead_code)]

use async_trait::async_trait;
use chat_memory::clock::Clock;
use chat_memory::config::prompt::PromptContext;
use chat_memory::controller::ConversationController;
use chat_memory::error::ProviderError;
use chat_memory::history::PersistentStore;
use chat_memory::llm::chat::ResponseProvider;
use std::sync::atomic::{ AtomicI64, AtomicUsize, Ordering };
use std::sync::Arc;

/// Clock the test moves by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(millis: i64) -> Arc<Self> {
        Arc::new(Self { now: AtomicI64::new(millis) })
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Never resolves.
#[derive(Debug, Default)]
pub struct HangingProvider {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ResponseProvider for HangingProvider {
    async fn respond(&self, _context: &str, _user_message: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    fn name(&self) -> &str {
        "hanging"
    }
}

/// Always rejects with the given reason.
#[derive(Debug)]
pub struct FailingProvider(pub &'static str);

#[async_trait]
impl ResponseProvider for FailingProvider {
    async fn respond(&self, _context: &str, _user_message: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Failed(self.0.to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub fn controller_with(
    store: Arc<dyn PersistentStore>,
    provider: Arc<dyn ResponseProvider>,
    context: &str
) -> ConversationController {
    ConversationController::new(store, provider, PromptContext::new(context))
}
