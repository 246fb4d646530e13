use crate::error::HistoryError;
use crate::history::PersistentStore;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{ Path, PathBuf };
use std::sync::{ Mutex, PoisonError };

/// Stores the slot as `<dir>/<key>.json`.
pub struct FileHistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileHistoryStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl PersistentStore for FileHistoryStore {
    fn read_slot(&self) -> Result<Option<String>, HistoryError> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HistoryError::io("reading history slot", &self.path, e)),
        }
    }

    fn write_slot(&self, payload: &str) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| HistoryError::io("creating history directory", parent, e))?;
            }
        }

        // Write aside then rename so the slot never holds a partial payload.
        let temp = self.temp_path();
        fs::write(&temp, payload).map_err(|e| HistoryError::io("writing history slot", &temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e|
            HistoryError::io("replacing history slot", &self.path, e)
        )?;
        debug!("Saved {} bytes of chat history to {}", payload.len(), self.path.display());
        Ok(())
    }
}
