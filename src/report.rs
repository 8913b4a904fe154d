//! Markdown chat reports.
//!
//! A report is the conversation rendered as Markdown, one section per turn,
//! written to a file whose name comes from a small template language:
//! literal text plus `{date}` / `{time}` tags, each taking an optional
//! strftime format (`{date:%Y-%m-%d}`).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use deunicode::deunicode;

use crate::session::Conversation;

/// Characters that are invalid in filenames on common filesystems.
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Maximum filename length for most filesystems.
const MAX_FILENAME_LENGTH: usize = 255;

/// Fallback when a template renders to nothing usable.
const FALLBACK_NAME: &str = "report";

const DEFAULT_DATE_FORMAT: &str = "%Y%m%d";
const DEFAULT_TIME_FORMAT: &str = "%H%M%S";

/// Errors from report naming and writing.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Template cannot be empty")]
    EmptyTemplate,

    #[error("Unclosed brace in template")]
    UnclosedBrace,

    #[error("Unmatched closing brace in template")]
    UnmatchedCloseBrace,

    #[error("Unknown template tag: {0}")]
    UnknownTag(String),

    #[error("Invalid format string: {0}")]
    InvalidFormat(String),

    #[error("Filename too long: {length} characters (max {max})")]
    TooLong { length: usize, max: usize },

    #[error("Failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A segment of a parsed filename template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Date(String),
    Time(String),
}

/// A parsed report filename template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportName {
    segments: Vec<Segment>,
}

impl ReportName {
    pub fn parse(template: &str) -> Result<Self, ReportError> {
        if template.is_empty() {
            return Err(ReportError::EmptyTemplate);
        }

        let mut segments = Vec::new();
        let mut chars = template.chars();
        let mut literal = String::new();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }

                    let mut tag = String::new();
                    let mut closed = false;
                    for tc in chars.by_ref() {
                        match tc {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(ReportError::UnclosedBrace),
                            _ => tag.push(tc),
                        }
                    }
                    if !closed {
                        return Err(ReportError::UnclosedBrace);
                    }
                    segments.push(parse_tag(&tag)?);
                }
                '}' => return Err(ReportError::UnmatchedCloseBrace),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Render to a filename (with `.md`) at the given instant.
    pub fn render(&self, now: DateTime<Local>) -> Result<String, ReportError> {
        let mut stem = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => stem.push_str(&sanitize_literal(text)),
                Segment::Date(fmt) | Segment::Time(fmt) => {
                    stem.push_str(&sanitize_literal(&now.format(fmt).to_string()))
                }
            }
        }

        let stem = stem.trim_matches(|c| c == '.' || c == ' ' || c == '-');
        let stem = if stem.is_empty() { FALLBACK_NAME } else { stem };

        let filename = if stem.ends_with(".md") {
            stem.to_string()
        } else {
            format!("{stem}.md")
        };

        if filename.len() > MAX_FILENAME_LENGTH {
            return Err(ReportError::TooLong {
                length: filename.len(),
                max: MAX_FILENAME_LENGTH,
            });
        }
        Ok(filename)
    }
}

fn parse_tag(content: &str) -> Result<Segment, ReportError> {
    let (name, format) = match content.split_once(':') {
        Some((name, fmt)) => (name, Some(fmt)),
        None => (content, None),
    };

    let default = match name {
        "date" => DEFAULT_DATE_FORMAT,
        "time" => DEFAULT_TIME_FORMAT,
        _ => return Err(ReportError::UnknownTag(name.to_string())),
    };

    let fmt = format.unwrap_or(default).to_string();
    if !has_strftime_specifier(&fmt) {
        return Err(ReportError::InvalidFormat(format!(
            "format string '{fmt}' contains no strftime specifiers"
        )));
    }

    if name == "date" {
        Ok(Segment::Date(fmt))
    } else {
        Ok(Segment::Time(fmt))
    }
}

fn has_strftime_specifier(fmt: &str) -> bool {
    const VALID_SPECIFIERS: &[char] = &[
        'Y', 'y', 'm', 'd', 'H', 'M', 'S', 'j', 'a', 'A', 'b', 'B', 'e', 'I', 'p', 'F', 'T', 's',
        'u',
    ];
    let mut chars = fmt.chars();
    while let Some(c) = chars.next() {
        if c == '%' && chars.next().is_some_and(|next| VALID_SPECIFIERS.contains(&next)) {
            return true;
        }
    }
    false
}

/// Transliterate to ASCII, map whitespace to `-`, drop unsafe characters.
fn sanitize_literal(input: &str) -> String {
    deunicode(input)
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('-'),
            c if INVALID_CHARS.contains(&c) => None,
            c if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') => Some(c),
            _ => None,
        })
        .collect()
}

/// Render the conversation as a Markdown report.
pub fn render_markdown(conversation: &Conversation, session_time: DateTime<Local>) -> String {
    let mut lines = vec![format!(
        "# CyberSecurity AI Chat Report\n\n**Session Date:** {}\n",
        session_time.format("%Y-%m-%d %H:%M:%S")
    )];

    for turn in conversation.turns() {
        lines.push(format!(
            "\n### {} - {}\n{}\n",
            turn.role.label(),
            turn.timestamp.format("%H:%M:%S"),
            turn.content.trim()
        ));
    }

    lines.join("\n")
}

/// Write the conversation report into `dir`, creating it if needed.
///
/// An existing report with the same name is overwritten.
pub fn write_report(
    dir: &Path,
    name: &ReportName,
    conversation: &Conversation,
) -> Result<PathBuf, ReportError> {
    let now = Local::now();
    let path = dir.join(name.render(now)?);

    fs::create_dir_all(dir).map_err(|source| ReportError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, render_markdown(conversation, now)).map_err(|source| ReportError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), turns = conversation.len(), "wrote chat report");
    Ok(path)
}
