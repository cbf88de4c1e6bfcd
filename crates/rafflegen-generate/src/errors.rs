use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by the fixture generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerationError::Io {
            path: path.into(),
            source,
        }
    }
}
