use crate::clock::{ Clock, SystemClock };
use crate::config::prompt::PromptContext;
use crate::error::{ ExportError, ProviderError };
use crate::export::{ self, ExportArtifact };
use crate::history::PersistentStore;
use crate::llm::chat::ResponseProvider;
use crate::models::chat::Message;
use crate::transcript::TranscriptModel;

use log::{ debug, info, warn };
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 30_000;
pub const MAX_INPUT_CHARS: usize = 1000;
pub const CLEAR_CONFIRMATION_PROMPT: &str = "Clear all chat history?";

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Empty,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted {
        request_id: RequestId,
    },
    Rejected(RejectReason),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    Declined,
}

/// Completion of one provider call, tagged with the request it answers.
#[derive(Debug)]
pub struct ResponseEvent {
    pub request_id: RequestId,
    pub result: Result<String, ProviderError>,
}

/// Yes/no gate consulted before destructive operations.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F where F: Fn(&str) -> bool {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub fn failure_text(reason: &str) -> String {
    format!("Sorry, I couldn't get a response: {}", reason)
}

struct PendingResponse {
    request_id: RequestId,
    task: JoinHandle<()>,
}

/// Drives the conversation: accepts submissions, requests replies, and keeps
/// the transcript (and therefore storage) in step.
///
/// All methods take `&mut self` and are meant to be called from a single task.
/// `submit` spawns the provider call onto the current tokio runtime; its result
/// comes back through [`ConversationController::next_response`].
pub struct ConversationController {
    transcript: TranscriptModel,
    provider: Arc<dyn ResponseProvider>,
    context: PromptContext,
    clock: Arc<dyn Clock>,
    response_timeout: Duration,
    input: String,
    pending: Option<PendingResponse>,
    next_request_id: RequestId,
    events_tx: mpsc::UnboundedSender<ResponseEvent>,
    events_rx: mpsc::UnboundedReceiver<ResponseEvent>,
}

impl ConversationController {
    pub fn new(
        store: Arc<dyn PersistentStore>,
        provider: Arc<dyn ResponseProvider>,
        context: PromptContext
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let transcript = TranscriptModel::new(store);
        info!("Restored {} message(s) from chat history", transcript.len());

        Self {
            transcript,
            provider,
            context,
            clock: Arc::new(SystemClock),
            response_timeout: Duration::from_millis(DEFAULT_RESPONSE_TIMEOUT_MS),
            input: String::new(),
            pending: None,
            next_request_id: 1,
            events_tx,
            events_rx,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn state(&self) -> ControllerState {
        if self.pending.is_some() {
            ControllerState::AwaitingResponse
        } else {
            ControllerState::Idle
        }
    }

    pub fn is_awaiting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn transcript(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn prompt_context(&self) -> &PromptContext {
        &self.context
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the pending input, keeping at most [`MAX_INPUT_CHARS`]
    /// characters.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.chars().take(MAX_INPUT_CHARS).collect();
    }

    /// Submits the pending input. The input is cleared only when accepted.
    pub fn submit_input(&mut self) -> SubmitOutcome {
        let input = self.input.clone();
        self.submit(&input)
    }

    /// Appends a user message and starts a provider request for it.
    ///
    /// Blank text and submissions made while a reply is pending are dropped
    /// without touching the transcript or storage.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        if let Some(pending) = &self.pending {
            debug!("Dropping submission while request {} is pending", pending.request_id);
            return SubmitOutcome::Rejected(RejectReason::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Rejected(RejectReason::Empty);
        }

        let ts = self.next_timestamp();
        self.transcript.append(Message::user(text, ts));
        self.input.clear();

        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let provider = Arc::clone(&self.provider);
        let context = self.context.clone();
        let user_message = text.to_string();
        let events_tx = self.events_tx.clone();
        let limit = self.response_timeout;

        let task = tokio::spawn(async move {
            let result = match
                tokio::time::timeout(limit, provider.respond(context.as_str(), &user_message)).await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(limit)),
            };
            let _ = events_tx.send(ResponseEvent { request_id, result });
        });

        info!("Request {} sent to {} provider", request_id, self.provider.name());
        self.pending = Some(PendingResponse { request_id, task });
        SubmitOutcome::Accepted { request_id }
    }

    /// Waits for the pending request to finish and appends its reply (or an
    /// error message). Returns `None` right away when nothing is pending.
    ///
    /// Cancel-safe: dropping the future before it resolves loses nothing.
    pub async fn next_response(&mut self) -> Option<Message> {
        while self.pending.is_some() {
            let event = self.events_rx.recv().await?;
            if let Some(message) = self.handle_response(event) {
                return Some(message);
            }
        }
        None
    }

    /// Applies a completed request. Events for anything other than the
    /// pending request are stale and ignored.
    pub fn handle_response(&mut self, event: ResponseEvent) -> Option<Message> {
        match &self.pending {
            Some(pending) if pending.request_id == event.request_id => {}
            _ => {
                debug!("Ignoring stale response for request {}", event.request_id);
                return None;
            }
        }
        self.pending = None;

        let text = match event.result {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("Request {} returned an empty response", event.request_id);
                failure_text("the response was empty")
            }
            Err(e) => {
                warn!("Request {} failed: {}", event.request_id, e);
                failure_text(&e.to_string())
            }
        };

        let message = Message::bot(text, self.next_timestamp());
        self.transcript.append(message.clone());
        Some(message)
    }

    /// Abandons the pending request, if any. Nothing is appended.
    pub fn cancel_response(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.task.abort();
                info!("Cancelled request {}", pending.request_id);
                true
            }
            None => false,
        }
    }

    /// Empties the transcript once `confirm` agrees. A pending request is
    /// cancelled first so its reply cannot land in the cleared conversation.
    pub fn clear_conversation<C: Confirm + ?Sized>(&mut self, confirm: &C) -> ClearOutcome {
        if !confirm.confirm(CLEAR_CONFIRMATION_PROMPT) {
            debug!("Clear declined");
            return ClearOutcome::Declined;
        }
        self.cancel_response();
        self.transcript.clear();
        info!("Conversation cleared");
        ClearOutcome::Cleared
    }

    pub fn export_transcript(&self) -> Result<ExportArtifact, ExportError> {
        export::export_transcript(self.transcript.messages(), self.clock.now_millis())
    }

    // Never earlier than anything already in the transcript.
    fn next_timestamp(&self) -> i64 {
        let now = self.clock.now_millis();
        match self.transcript.last_timestamp() {
            Some(last) => now.max(last),
            None => now,
        }
    }
}

impl Drop for ConversationController {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }
}
