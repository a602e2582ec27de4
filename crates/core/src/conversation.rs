//! Conversation domain types.
//!
//! The service keeps no session state: the caller sends its history with
//! every chat request and receives it back extended by one exchange.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The legal assistant
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who sent this turn
    pub role: Role,

    /// The text content
    pub content: String,
}

impl ConversationTurn {
    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An ordered, caller-owned sequence of turns.
///
/// Turns are only ever appended in (user, assistant) pairs; existing turns
/// are never reordered or rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory(Vec<ConversationTurn>);

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one user/assistant exchange.
    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.0.push(ConversationTurn::user(user));
        self.0.push(ConversationTurn::assistant(assistant));
    }

    /// Consume the history and return it extended by one exchange.
    pub fn with_exchange(mut self, user: impl Into<String>, assistant: impl Into<String>) -> Self {
        self.push_exchange(user, assistant);
        self
    }

    /// The last `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> &[ConversationTurn] {
        let start = self.0.len().saturating_sub(n);
        &self.0[start..]
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ConversationTurn>> for ConversationHistory {
    fn from(turns: Vec<ConversationTurn>) -> Self {
        Self(turns)
    }
}

impl IntoIterator for ConversationHistory {
    type Item = ConversationTurn;
    type IntoIter = std::vec::IntoIter<ConversationTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
