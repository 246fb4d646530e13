use crate::history::PersistentStore;
use crate::models::chat::Message;
use log::error;
use std::sync::Arc;

/// Ordered, append-only message log. Every transition is written through to
/// the store before the call returns.
pub struct TranscriptModel {
    messages: Vec<Message>,
    store: Arc<dyn PersistentStore>,
}

impl TranscriptModel {
    pub fn new(store: Arc<dyn PersistentStore>) -> Self {
        let messages = store.load();
        Self { messages, store }
    }

    pub fn append(&mut self, message: Message) -> &[Message] {
        self.messages.push(message);
        self.persist();
        &self.messages
    }

    pub fn clear(&mut self) -> &[Message] {
        self.messages.clear();
        self.persist();
        &self.messages
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.messages.iter().map(|m| m.ts).max()
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.messages) {
            error!("Failed to persist transcript ({} messages): {}", self.messages.len(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistoryStore;

    #[test]
    fn starts_from_stored_transcript() {
        let store = Arc::new(
            MemoryHistoryStore::with_payload(r#"[{"by":"user","text":"earlier","ts":5}]"#)
        );
        let model = TranscriptModel::new(store);
        assert_eq!(model.messages(), &[Message::user("earlier", 5)]);
        assert_eq!(model.last_timestamp(), Some(5));
    }

    #[test]
    fn every_transition_is_persisted() {
        let store = Arc::new(MemoryHistoryStore::new());
        let mut model = TranscriptModel::new(store.clone());

        model.append(Message::user("one", 1));
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.load(), model.messages());

        model.append(Message::bot("two", 2));
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.load().len(), 2);

        model.clear();
        assert_eq!(store.write_count(), 3);
        assert_eq!(store.payload().as_deref(), Some("[]"));
        assert!(model.is_empty());
    }

    #[test]
    fn append_keeps_existing_entries_in_place() {
        let store = Arc::new(MemoryHistoryStore::new());
        let mut model = TranscriptModel::new(store);
        model.append(Message::user("a", 1));
        let first = model.messages()[0].clone();
        model.append(Message::bot("b", 1));
        assert_eq!(model.messages()[0], first);
        assert_eq!(model.last(), Some(&Message::bot("b", 1)));
    }
}
