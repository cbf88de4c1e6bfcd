use std::io;
use std::path::{Path, PathBuf};

use rafflegen_core::Error as CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed file: {0}")]
    Core(#[from] CoreError),
}

impl ValidationError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
