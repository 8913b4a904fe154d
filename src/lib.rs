//! Shellscope - security analysis of terminal sessions
//!
//! Cleans the log of a recorded terminal session, finds the last command
//! and its output, and asks a hosted language model for a security
//! assessment. The same flows are exposed on the command line and over HTTP.

pub mod assistant;
pub mod cli;
pub mod config;
pub mod llm;
pub mod prompt;
pub mod report;
pub mod server;
pub mod session;
pub mod theme;
pub mod transcript;

pub use assistant::{Analysis, AnalysisError, Assistant};
pub use config::Config;
pub use session::Conversation;
pub use transcript::{CommandRecord, Extraction, TranscriptPaths};
