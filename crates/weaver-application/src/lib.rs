//! Application layer for SiteWeaver.
//!
//! Coordinates the three writers of a session's document — AI
//! regeneration, preview edits arriving over the message bridge, and raw
//! import — against the single authoritative [`EditSession`] state, and
//! sequences prompt submission through the generation collaborator.

mod bridge;
mod edit_session;
mod orchestrator;

pub use bridge::MessageBridge;
pub use edit_session::EditSession;
pub use orchestrator::{
    GENERATION_FAILURE_MESSAGE, GenerationOrchestrator, IMPORT_SUCCESS_MESSAGE,
    INITIAL_SUCCESS_MESSAGE, SubmitOutcome, UPDATE_SUCCESS_MESSAGE,
};
