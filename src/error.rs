use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize transcript: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("unsupported history store type: {0}")]
    UnsupportedType(String),
}

impl HistoryError {
    pub(crate) fn io(operation: &'static str, path: &std::path::Path, source: std::io::Error) -> Self {
        HistoryError::Io {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no response within {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize transcript for export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write export to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid provider type: '{0}'")]
    InvalidProvider(String),

    #[error("failed to read prompt context from '{path}': {source}")]
    PromptIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch prompt context from '{url}': {source}")]
    PromptFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
