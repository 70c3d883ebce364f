//! Document export and import.
//!
//! Export serializes the document verbatim as a downloadable file; import
//! accepts arbitrary user-supplied markup as-is, with no validation that
//! it is well-formed.

use std::fs;
use std::path::{Path, PathBuf};
use weaver_core::error::Result;
use weaver_core::session::Session;

/// Turns a session name into a file slug: lowercased, whitespace runs
/// collapsed into single dashes.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Writes the session's document verbatim to `<slug>.html` under `dir`,
/// returning the path written.
pub fn export_document(session: &Session, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.html", slugify(&session.name)));
    fs::write(&path, &session.document)?;
    tracing::info!(?path, "document exported");
    Ok(path)
}

/// Reads a markup file as-is, to be treated as a fresh document.
pub fn import_document(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}
