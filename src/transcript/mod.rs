//! Terminal transcript extraction pipeline.
//!
//! A raw session log captured from a terminal is full of escape sequences
//! (colors, cursor movement, title updates). Before the most recent command
//! can be handed to a model it goes through two stages:
//!
//! - [`sanitize`] - strips control sequences and non-printable bytes and
//!   writes a plain-text copy of the log
//! - [`segment`] - splits the plain-text log into command records, keyed on
//!   lines starting with the `"# "` command marker, and returns the last one
//!
//! Both stages are synchronous, whole-file transforms. The pipeline has no
//! knowledge of the model layer that consumes its result.

mod error;
mod sanitize;
mod segment;

pub use error::TranscriptError;
pub use sanitize::{sanitize, sanitize_bytes, sanitize_text, SanitizeStats};
pub use segment::{
    extract_last, extract_last_from_str, is_command_marker, segment, CommandRecord, Extraction,
    COMMAND_MARKER,
};

use std::borrow::Cow;
use std::path::PathBuf;

/// Turn `\r\n` and lone `\r` line breaks into `\n`.
///
/// Terminal progress output redraws with a bare `\r`, and a prompt can
/// follow one on the same physical line, so every `\r` counts as a break.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Locations of the raw and cleaned transcripts for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptPaths {
    /// Log written by the terminal recorder (read-only input)
    pub raw: PathBuf,
    /// Plain-text copy regenerated on every sanitize run
    pub clean: PathBuf,
}

impl TranscriptPaths {
    pub fn new(raw: impl Into<PathBuf>, clean: impl Into<PathBuf>) -> Self {
        Self {
            raw: raw.into(),
            clean: clean.into(),
        }
    }
}
