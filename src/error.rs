use std::path::PathBuf;

use thiserror::Error;

/// Structural failures that terminate a pipeline stage.
///
/// Missing data never shows up here: absent tables, fields and pattern misses
/// are represented as `None` on the record.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record batch in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("page store: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("graph serialization: {0}")]
    Serialize(String),
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
