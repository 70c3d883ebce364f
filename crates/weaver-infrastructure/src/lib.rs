//! Infrastructure layer for SiteWeaver.
//!
//! File-backed implementations of the core persistence traits, the
//! built-in template catalog, and document export/import. Storage is
//! best-effort local; a failed write simply leaves a session unsynced.

mod export;
mod session_repository;
mod templates;
mod user_store;

pub use export::{export_document, import_document, slugify};
pub use session_repository::TomlSessionRepository;
pub use templates::{all_templates, template_by_id};
pub use user_store::TomlUserStore;
