//! Core domain layer for SiteWeaver.
//!
//! This crate holds the pure domain of the application: the session model
//! (document + chat history + sync status), the element-selection state,
//! the cross-context preview protocol, the document instrumentor, and the
//! traits implemented by the outer collaborator crates (persistence,
//! generation, user identity).
//!
//! Nothing in here performs I/O; all side effects live behind the traits.

pub mod config;
pub mod error;
pub mod generate;
pub mod instrument;
pub mod protocol;
pub mod selection;
pub mod session;
pub mod user;

// Re-export common error type
pub use error::{Result, WeaverError};
