//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for managing session persistence.
///
/// This trait decouples the application's core logic from the specific
/// storage mechanism (TOML files, database, remote API). Persistence is
/// best-effort: callers treat a failed save as "still unsynced", never as
/// a fatal error.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: session found
    /// - `Ok(None)`: session not found
    /// - `Err(_)`: error occurred during retrieval
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Saves a session to storage.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Deletes a session from storage. Deleting a missing session is not
    /// an error.
    async fn delete(&self, session_id: &str) -> Result<()>;

    /// Lists all stored sessions, most recently created first.
    async fn list_all(&self) -> Result<Vec<Session>>;

    /// Gets the ID of the currently active session, if any.
    async fn get_active_session_id(&self) -> Result<Option<String>>;

    /// Sets the ID of the currently active session.
    async fn set_active_session_id(&self, session_id: &str) -> Result<()>;
}
