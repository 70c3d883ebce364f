//! TOML-based user store.
//!
//! Persists the local display-name stub (`user.toml`). There is no
//! authentication here by design.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use weaver_core::error::{Result, WeaverError};
use weaver_core::user::{User, UserService};

/// Stores the signed-in user as `user.toml` under the base directory.
pub struct TomlUserStore {
    user_file: PathBuf,
}

impl TomlUserStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)
            .map_err(|e| WeaverError::io(format!("Failed to create user directory: {e}")))?;
        Ok(Self {
            user_file: base_dir.join("user.toml"),
        })
    }
}

#[async_trait]
impl UserService for TomlUserStore {
    async fn current_user(&self) -> Result<Option<User>> {
        if !self.user_file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.user_file)?;
        let user = toml::from_str(&content)?;
        Ok(Some(user))
    }

    async fn sign_in(&self, email: &str) -> Result<User> {
        let user = User::from_email(email);
        let content = toml::to_string_pretty(&user)?;
        fs::write(&self.user_file, content)?;
        tracing::info!(name = %user.name, "user signed in");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        if self.user_file.exists() {
            fs::remove_file(&self.user_file)?;
        }
        Ok(())
    }
}
