//! Application configuration.
//!
//! Storage location and generation credentials are carried in an explicit
//! configuration struct passed into the collaborators at construction,
//! never read from ambient globals.

use crate::error::{Result, WeaverError};
use std::path::PathBuf;

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration handed to the persistence and generation collaborators.
#[derive(Debug, Clone)]
pub struct WeaverConfig {
    /// API key for the generation service.
    pub api_key: String,
    /// Generation model name.
    pub model: String,
    /// Base directory for persisted sessions and user state.
    pub storage_dir: PathBuf,
}

impl WeaverConfig {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        storage_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            storage_dir: storage_dir.into(),
        }
    }

    /// Builds a configuration from the environment.
    ///
    /// Reads `GEMINI_API_KEY` (may be empty; generation will then fail at
    /// call time), `SITEWEAVER_MODEL`, and `SITEWEAVER_HOME`, falling
    /// back to `<config dir>/siteweaver` for storage.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        let model =
            std::env::var("SITEWEAVER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let storage_dir = match std::env::var("SITEWEAVER_HOME") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::config_dir()
                .ok_or_else(|| WeaverError::config("Cannot determine config directory"))?
                .join("siteweaver"),
        };

        Ok(Self {
            api_key,
            model,
            storage_dir,
        })
    }
}
