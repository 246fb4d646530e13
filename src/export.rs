use crate::error::ExportError;
use crate::models::chat::Message;
use log::info;
use std::fs;
use std::path::{ Path, PathBuf };

pub const EXPORT_FILE_PREFIX: &str = "chat-conversation-";

/// A serialized transcript ready to be handed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

pub fn export_file_name(epoch_millis: i64) -> String {
    format!("{}{}.json", EXPORT_FILE_PREFIX, epoch_millis)
}

/// Pretty-prints the transcript (two-space indent) using the persisted record
/// shape.
pub fn export_transcript(
    messages: &[Message],
    epoch_millis: i64
) -> Result<ExportArtifact, ExportError> {
    let contents = serde_json::to_string_pretty(messages)?;
    Ok(ExportArtifact {
        file_name: export_file_name(epoch_millis),
        contents,
    })
}

impl ExportArtifact {
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| ExportError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.contents).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        info!("Exported conversation to {}", path.display());
        Ok(path)
    }
}
