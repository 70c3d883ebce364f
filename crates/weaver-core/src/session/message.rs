//! Chat turn types.
//!
//! Types for representing the prompt/response exchange that produced the
//! current document. The history is append-only and is replayed verbatim
//! into the generation collaborator as conversation context.

use serde::{Deserialize, Serialize};

/// Represents the speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Turn authored by the user.
    User,
    /// Turn authored by the AI assistant.
    Assistant,
}

/// A single turn in a session's chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who authored the turn.
    pub role: MessageRole,
    /// The content of the turn.
    pub text: String,
    /// Timestamp when the turn was created (RFC 3339 format).
    pub timestamp: String,
}

impl ChatTurn {
    /// Creates a user turn stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates an assistant turn stamped with the current time.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
