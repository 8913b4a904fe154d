//! Control sequence removal for raw terminal logs.
//!
//! Line breaks are normalized first (`\r\n` and lone `\r` become `\n`),
//! then the cleaning runs three regex passes, in this order:
//!
//! 1. ANSI escapes: `ESC` + a single byte in `@`..=`_`, or a CSI sequence
//!    `ESC [` + parameter bytes + intermediate bytes + a final byte
//! 2. Any `ESC [ <digits/semicolons> <letter>` left behind by pass 1. Removing
//!    one sequence in pass 1 can splice a new one together out of its
//!    neighbours (`ESC [ ESC[0m 31m`), so this pass is not a no-op.
//! 3. Every character outside printable ASCII, `\r` and `\n`
//!
//! Tabs, bells and any non-ASCII text are dropped by pass 3. No `\r`
//! reaches the clean file.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{normalize_newlines, TranscriptError};

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B(?:[@-Z\x5C-_]|\[[0-?]*[ -/]*[@-~])").expect("ANSI escape pattern is valid")
});

static RESIDUAL_CSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[a-zA-Z]").expect("CSI pattern is valid"));

static NON_PRINTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x20-\x7E\r\n]").expect("printable pattern is valid"));

/// Byte counts from a sanitize run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeStats {
    pub raw_bytes: usize,
    pub clean_bytes: usize,
}

impl SanitizeStats {
    /// Bytes removed by cleaning.
    pub fn removed_bytes(&self) -> usize {
        self.raw_bytes.saturating_sub(self.clean_bytes)
    }
}

/// Strip terminal control sequences and non-printable characters from text.
pub fn sanitize_text(raw: &str) -> String {
    let text = normalize_newlines(raw);
    let pass1 = ANSI_ESCAPE.replace_all(&text, "");
    let pass2 = RESIDUAL_CSI.replace_all(&pass1, "");
    NON_PRINTABLE.replace_all(&pass2, "").into_owned()
}

/// Decode raw log bytes and sanitize them.
///
/// Invalid UTF-8 never fails the decode: bad sequences become U+FFFD,
/// which the printable-ASCII pass then removes.
pub fn sanitize_bytes(raw: &[u8]) -> String {
    sanitize_text(&String::from_utf8_lossy(raw))
}

/// Clean the log at `raw_path` and write the result to `clean_path`.
///
/// Any existing file at `clean_path` is truncated and overwritten.
pub fn sanitize(raw_path: &Path, clean_path: &Path) -> Result<SanitizeStats, TranscriptError> {
    let raw = fs::read(raw_path).map_err(|source| TranscriptError::Read {
        path: raw_path.to_path_buf(),
        source,
    })?;

    let cleaned = sanitize_bytes(&raw);

    fs::write(clean_path, cleaned.as_bytes()).map_err(|source| TranscriptError::Write {
        path: clean_path.to_path_buf(),
        source,
    })?;

    let stats = SanitizeStats {
        raw_bytes: raw.len(),
        clean_bytes: cleaned.len(),
    };
    tracing::debug!(
        raw = %raw_path.display(),
        clean = %clean_path.display(),
        raw_bytes = stats.raw_bytes,
        clean_bytes = stats.clean_bytes,
        "sanitized transcript"
    );
    Ok(stats)
}
