//! Session domain model.
//!
//! The `Session` entity owns the authoritative document for one project.
//! The document is an opaque, complete markup string, replaced wholesale
//! on every mutation; structural edits happen inside the preview sandbox,
//! never in this model.

use super::message::{ChatTurn, MessageRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document a freshly created session starts with, shown while the first
/// generation is still in flight. Its presence (together with a single
/// pending user turn) is what triggers the automatic initial generation.
pub const PLACEHOLDER_DOCUMENT: &str = "<div style=\"display:flex;height:100vh;justify-content:center;align-items:center;font-family:sans-serif;color:#64748b;flex-direction:column;gap:1rem;\"><div style=\"font-size:1.5rem;font-weight:bold;\">Generating your design...</div><div style=\"font-size:0.9rem;\">Powered by Gemini</div></div>";

/// Text fragment identifying the placeholder document.
const PLACEHOLDER_TEXT: &str = "Generating your design";

/// Longest session name derived from the originating prompt.
const MAX_NAME_LEN: usize = 25;

/// A project session.
///
/// Aggregates one document, its chat history, a sync flag
/// (authoritative-copy vs. pending-write), and a display name/id.
///
/// Three writers may replace the document: generation, preview edits
/// arriving over the message bridge, and raw import. All three replace it
/// wholesale; the last writer wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format).
    pub id: String,
    /// Human-readable session name, derived from the originating prompt.
    pub name: String,
    /// Timestamp when the session was created (RFC 3339 format).
    pub created_at: String,
    /// Optional preview thumbnail URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Whether the stored copy matches this in-memory state.
    #[serde(default)]
    pub synced: bool,
    /// The full markup document. Always a complete renderable document
    /// after the first successful generation.
    pub document: String,
    /// Append-only chat history. The first turn is always the
    /// originating prompt.
    pub history: Vec<ChatTurn>,
}

impl Session {
    /// Creates a fresh session from an originating prompt.
    ///
    /// The session starts with the placeholder document and a single
    /// pending user turn, which the orchestrator detects to run the
    /// first generation without further user action.
    pub fn new(prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        Self {
            id: Uuid::new_v4().to_string(),
            name: derive_name(&prompt),
            created_at: chrono::Utc::now().to_rfc3339(),
            thumbnail: None,
            document: PLACEHOLDER_DOCUMENT.to_string(),
            history: vec![ChatTurn::user(prompt)],
            synced: false,
        }
    }

    /// True while the session still shows the placeholder and holds only
    /// the originating prompt, i.e. the first generation has not run yet.
    pub fn needs_initial_generation(&self) -> bool {
        self.document.contains(PLACEHOLDER_TEXT) && self.history.len() == 1
    }

    /// True once the document is a real generated (or imported) document
    /// rather than the initial placeholder.
    pub fn has_generated_document(&self) -> bool {
        !self.document.contains(PLACEHOLDER_TEXT) && self.document.len() > 50
    }

    /// Returns the originating prompt, when present.
    pub fn initial_prompt(&self) -> Option<&str> {
        self.history
            .first()
            .filter(|turn| turn.role == MessageRole::User)
            .map(|turn| turn.text.as_str())
    }
}

/// Derives a display name from the originating prompt.
fn derive_name(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.chars().count() > MAX_NAME_LEN {
        let head: String = trimmed.chars().take(MAX_NAME_LEN).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}
