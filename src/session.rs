//! Conversation memory.
//!
//! A [`Conversation`] is an append-only list of turns owned by whoever drives
//! the chat (the server state, or the interactive `chat` command). It is
//! passed explicitly rather than living in a global, and `clear()` resets it.

use chrono::{DateTime, Local};

use crate::llm::ChatMessage;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Human,
    Ai,
}

impl Role {
    /// Label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Human => "You",
            Self::Ai => "AI",
        }
    }
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl Turn {
    pub fn human(content: impl Into<String>) -> Self {
        Self::now(Role::Human, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::now(Role::Ai, content)
    }

    fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Local::now(),
        }
    }

    fn to_message(&self) -> ChatMessage {
        match self.role {
            Role::Human => ChatMessage::user(&self.content),
            Role::Ai => ChatMessage::assistant(&self.content),
        }
    }
}

/// Ordered history of human and AI turns.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Record a completed human/AI exchange.
    pub fn record_exchange(&mut self, human: impl Into<String>, ai: impl Into<String>) {
        self.append(Turn::human(human));
        self.append(Turn::ai(ai));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Build the message list for a model request: the system prompt, the
    /// history in order, then the new user input.
    pub fn to_messages(&self, system: &str, input: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.turns.len() + 2);
        messages.push(ChatMessage::system(system));
        messages.extend(self.turns.iter().map(Turn::to_message));
        messages.push(ChatMessage::user(input));
        messages
    }
}
