//! Command/output segmentation of a cleaned transcript.
//!
//! **Algorithm** (single pass, one record under construction):
//! 1. A line whose trimmed form starts with `"# "` is a command marker. It
//!    flushes the current record (if it has a command) and starts a new one.
//! 2. Any other line is appended, right-trimmed, to the current record's
//!    output.
//! 3. Lines before the first marker belong to no record and are discarded.
//! 4. The record still open at end of input is flushed.
//!
//! A line ends at `\n`, `\r\n` or a lone `\r`.
//!
//! The marker test does not look at what follows `"# "`, so a `# comment`
//! line printed by `cat` also starts a new record.

use std::fs;
use std::path::{Path, PathBuf};

use super::normalize_newlines;

/// Prefix that marks a line as a command typed by the operator.
pub const COMMAND_MARKER: &str = "# ";

/// A command line and the output lines that followed it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandRecord {
    pub command: String,
    pub output_lines: Vec<String>,
}

impl CommandRecord {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            output_lines: Vec::new(),
        }
    }

    /// Output lines joined with `\n`.
    pub fn output(&self) -> String {
        self.output_lines.join("\n")
    }

    /// Whether any output line was captured (blank lines count).
    pub fn has_output(&self) -> bool {
        !self.output_lines.is_empty()
    }
}

/// Outcome of looking up the most recent command in a clean transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The last command record in the transcript
    Found(CommandRecord),
    /// The transcript was read but contains no command marker
    NoCommand,
    /// The transcript does not exist or could not be read
    NotFound { path: PathBuf },
}

impl Extraction {
    /// The record, if one was found.
    pub fn record(&self) -> Option<&CommandRecord> {
        match self {
            Self::Found(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<CommandRecord> {
        match self {
            Self::Found(record) => Some(record),
            _ => None,
        }
    }
}

/// Return the command text if `line` is a command marker line.
pub fn is_command_marker(line: &str) -> Option<&str> {
    line.trim().strip_prefix(COMMAND_MARKER)
}

/// Split a clean transcript into command records, in marker order.
pub fn segment(text: &str) -> Vec<CommandRecord> {
    let mut records = Vec::new();
    let mut current = CommandRecord::default();

    let text = normalize_newlines(text);
    for line in text.lines() {
        match is_command_marker(line) {
            Some(command) => {
                if !current.command.is_empty() {
                    records.push(std::mem::take(&mut current));
                }
                current.command = command.to_string();
            }
            None if !current.command.is_empty() => {
                current.output_lines.push(line.trim_end().to_string());
            }
            None => {}
        }
    }

    if !current.command.is_empty() {
        records.push(current);
    }

    records
}

/// Find the most recent command record in clean transcript text.
pub fn extract_last_from_str(text: &str) -> Extraction {
    match segment(text).pop() {
        Some(record) => Extraction::Found(record),
        None => Extraction::NoCommand,
    }
}

/// Find the most recent command record in the clean transcript at `path`.
///
/// A missing or unreadable file is reported as [`Extraction::NotFound`].
pub fn extract_last(path: &Path) -> Extraction {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "clean transcript unavailable");
            return Extraction::NotFound {
                path: path.to_path_buf(),
            };
        }
    };

    let extraction = extract_last_from_str(&String::from_utf8_lossy(&bytes));
    if let Extraction::Found(record) = &extraction {
        tracing::debug!(
            command = %record.command,
            output_lines = record.output_lines.len(),
            "extracted last command"
        );
    }
    extraction
}
