use crate::error::HistoryError;
use crate::history::PersistentStore;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::{ Mutex, PoisonError };

/// Process-local slot. Counts writes so callers can tell whether a transition
/// reached storage.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    slot: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `payload` already in the slot, as if a previous session
    /// (or something else) had written it.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(payload.into())),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn payload(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl PersistentStore for MemoryHistoryStore {
    fn read_slot(&self) -> Result<Option<String>, HistoryError> {
        Ok(self.payload())
    }

    fn write_slot(&self, payload: &str) -> Result<(), HistoryError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(payload.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
