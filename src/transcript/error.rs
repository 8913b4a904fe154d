//! Transcript pipeline errors.

use std::path::PathBuf;

/// Errors raised while producing a clean transcript.
///
/// Undecodable bytes in the raw log are never an error; they are dropped
/// during sanitization.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("Failed to read raw log {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write clean log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TranscriptError {
    /// Whether the raw log simply does not exist yet.
    pub fn is_missing_raw_log(&self) -> bool {
        matches!(
            self,
            Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
