//! Document generation trait.
//!
//! Defines the interface to the external text-generation service that
//! turns instructions into full markup documents.

use crate::session::ChatTurn;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the generation collaborator.
///
/// These never propagate past the orchestrator boundary; they are
/// converted into a fixed user-facing chat turn.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The upstream call failed (transport, HTTP status, parse).
    #[error("generation request failed: {0}")]
    Upstream(String),

    /// The upstream call succeeded but returned no usable document.
    #[error("generation returned no usable document")]
    EmptyOutput,
}

/// The external service producing documents from instructions.
///
/// Implementations must return a complete, self-contained markup
/// document, with any code-fence markup the upstream model echoes back
/// already stripped.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    /// Generates a new document.
    ///
    /// # Arguments
    ///
    /// * `instruction` - the user's request
    /// * `current_document` - the current document when a real generated
    ///   document exists, empty otherwise
    /// * `history` - the full prior chat history, replayed verbatim as
    ///   conversation context
    async fn generate(
        &self,
        instruction: &str,
        current_document: &str,
        history: &[ChatTurn],
    ) -> Result<String, GenerationError>;
}
