//! User service trait.

use super::model::User;
use crate::error::Result;
use async_trait::async_trait;

/// Service for the local user identity stub.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Returns the currently signed-in user, if any.
    async fn current_user(&self) -> Result<Option<User>>;

    /// Signs a user in by email, replacing any previous identity.
    async fn sign_in(&self, email: &str) -> Result<User>;

    /// Signs the current user out. Signing out with nobody signed in is
    /// not an error.
    async fn sign_out(&self) -> Result<()>;
}
