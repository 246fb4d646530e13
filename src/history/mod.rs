mod file;
mod memory;

pub use file::FileHistoryStore;
pub use memory::MemoryHistoryStore;

use crate::cli::Args;
use crate::error::HistoryError;
use crate::models::chat::Message;
use log::{ info, warn };
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub const DEFAULT_HISTORY_KEY: &str = "chat-memories";

/// Durable single-slot storage for the transcript.
///
/// Backends only move raw payloads in and out of their slot; `load` and `save`
/// share one record codec so every backend validates the same way.
pub trait PersistentStore: Send + Sync {
    fn read_slot(&self) -> Result<Option<String>, HistoryError>;

    /// Replaces the whole slot with `payload`.
    fn write_slot(&self, payload: &str) -> Result<(), HistoryError>;

    /// Returns the last saved transcript, or an empty one when nothing usable
    /// is stored. Never fails.
    fn load(&self) -> Vec<Message> {
        match self.read_slot() {
            Ok(Some(payload)) => decode_transcript(&payload),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read chat history, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    fn save(&self, messages: &[Message]) -> Result<(), HistoryError> {
        let payload = encode_transcript(messages)?;
        self.write_slot(&payload)
    }
}

pub fn encode_transcript(messages: &[Message]) -> Result<String, serde_json::Error> {
    serde_json::to_string(messages)
}

/// Decodes a stored payload record by record. A payload that is not a JSON
/// array yields nothing; individual records that do not match
/// `{ by, text, ts }` (or carry empty text) are dropped.
pub fn decode_transcript(payload: &str) -> Vec<Message> {
    let entries = match serde_json::from_str::<Vec<JsonValue>>(payload) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Stored chat history is not a JSON array, starting empty: {}", e);
            return Vec::new();
        }
    };

    let mut messages = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Message>(entry) {
            Ok(msg) if !msg.text.is_empty() => messages.push(msg),
            Ok(_) => warn!("Dropping history entry {}: empty text", index),
            Err(e) => warn!("Dropping history entry {}: {}", index, e),
        }
    }
    messages
}

pub fn create_history_store(args: &Args) -> Result<Arc<dyn PersistentStore>, HistoryError> {
    match args.history_type.to_lowercase().as_str() {
        "file" => {
            let store = FileHistoryStore::new(&args.history_dir, &args.history_key);
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryHistoryStore::new())),
        other => Err(HistoryError::UnsupportedType(other.to_string())),
    }
}

pub fn initialize_history_store(args: &Args) -> Result<Arc<dyn PersistentStore>, HistoryError> {
    info!(
        "Chat history will be stored in: {} (key '{}') at {}",
        args.history_type,
        args.history_key,
        args.history_dir
    );
    create_history_store(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Sender;

    #[test]
    fn decodes_well_formed_payload() {
        let payload = r#"[{"by":"user","text":"hi","ts":1},{"by":"bot","text":"yo","ts":2}]"#;
        let messages = decode_transcript(payload);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].by, Sender::User);
        assert_eq!(messages[1].text, "yo");
    }

    #[test]
    fn non_array_payloads_decode_to_nothing() {
        assert!(decode_transcript("not json").is_empty());
        assert!(decode_transcript(r#"{"by":"user","text":"hi","ts":1}"#).is_empty());
        assert!(decode_transcript("").is_empty());
        assert!(decode_transcript("null").is_empty());
    }

    #[test]
    fn drops_only_invalid_records() {
        let payload = r#"[
            {"by":"user","text":"keep me","ts":1},
            {"by":"user","ts":2},
            {"by":"robot","text":"bad sender","ts":3},
            {"by":"bot","text":"","ts":4},
            {"by":"bot","text":"bad ts","ts":"5"},
            42,
            {"by":"bot","text":"and me","ts":6}
        ]"#;
        let texts: Vec<_> = decode_transcript(payload)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["keep me", "and me"]);
    }

    #[test]
    fn memory_store_round_trips_through_codec() {
        let store = MemoryHistoryStore::new();
        let messages = vec![
            Message::user("line one\nline two", 10),
            Message::bot("héllo 🌍", 11),
        ];
        store.save(&messages).unwrap();
        assert_eq!(store.load(), messages);
    }
}
