//! TOML-based SessionRepository implementation.

use crate::templates::template_by_id;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use weaver_core::error::{Result, WeaverError};
use weaver_core::session::{Session, SessionRepository};

/// A repository implementation storing sessions as individual TOML files.
///
/// Directory structure:
/// ```text
/// base_dir/
/// ├── sessions/
/// │   ├── <session-id-1>.toml
/// │   └── <session-id-2>.toml
/// └── active_session.txt
/// ```
///
/// Built-in templates are resolved by `find_by_id` before disk and
/// returned as fresh copies; they never appear in `list_all`.
pub struct TomlSessionRepository {
    base_dir: PathBuf,
}

impl TomlSessionRepository {
    /// Creates a repository rooted at `base_dir`, creating the directory
    /// structure if it doesn't exist.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        let sessions_dir = base_dir.join("sessions");
        fs::create_dir_all(&sessions_dir)
            .map_err(|e| WeaverError::io(format!("Failed to create sessions directory: {e}")))?;

        Ok(Self { base_dir })
    }

    /// Creates a repository at the default location
    /// (`<config dir>/siteweaver`).
    pub fn default_location() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| WeaverError::config("Failed to get config directory"))?
            .join("siteweaver");
        Self::new(base_dir)
    }

    /// Returns the file path for a given session ID.
    fn session_file_path(&self, session_id: &str) -> PathBuf {
        self.base_dir
            .join("sessions")
            .join(format!("{}.toml", session_id))
    }

    fn load_session_from_path(&self, path: &Path) -> Result<Session> {
        let content = fs::read_to_string(path)?;
        let session = toml::from_str(&content)?;
        Ok(session)
    }
}

#[async_trait]
impl SessionRepository for TomlSessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        // Built-in templates shadow disk; callers get a fresh copy.
        if let Some(template) = template_by_id(session_id) {
            return Ok(Some(template));
        }

        let file_path = self.session_file_path(session_id);
        if !file_path.exists() {
            return Ok(None);
        }

        self.load_session_from_path(&file_path).map(Some)
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let file_path = self.session_file_path(&session.id);
        let content = toml::to_string_pretty(session)?;
        fs::write(&file_path, content)?;
        tracing::debug!(session_id = %session.id, "session saved");
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let file_path = self.session_file_path(session_id);
        if file_path.exists() {
            fs::remove_file(&file_path)?;
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Session>> {
        let sessions_dir = self.base_dir.join("sessions");
        let mut sessions = Vec::new();

        for entry in fs::read_dir(&sessions_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                match self.load_session_from_path(&path) {
                    Ok(session) => sessions.push(session),
                    Err(e) => {
                        tracing::warn!(?path, error = %e, "skipping unreadable session file");
                    }
                }
            }
        }

        // Most recent first.
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(sessions)
    }

    async fn get_active_session_id(&self) -> Result<Option<String>> {
        let active_file = self.base_dir.join("active_session.txt");

        if !active_file.exists() {
            return Ok(None);
        }

        let session_id = fs::read_to_string(&active_file)?;
        Ok(Some(session_id.trim().to_string()))
    }

    async fn set_active_session_id(&self, session_id: &str) -> Result<()> {
        let active_file = self.base_dir.join("active_session.txt");
        fs::write(&active_file, session_id)?;
        Ok(())
    }
}
