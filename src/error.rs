use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum TreeIndexError {
    #[error("Path is not a directory: {path}")]
    NotADirectory {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(String),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(#[source] serde_json::Error),
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
impl TreeIndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TreeIndexError::Io {
            path: path.into(),
            source,
        }
    }
    pub(crate) fn not_a_directory(path: impl Into<PathBuf>, source: Option<std::io::Error>) -> Self {
        TreeIndexError::NotADirectory {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = TreeIndexError> = std::result::Result<T, E>;
