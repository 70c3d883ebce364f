//! Session domain module.
//!
//! A session is one project: the generated document, its chat history,
//! and its persistence status.
//!
//! - `model`: core session entity (`Session`)
//! - `message`: chat turn types (`MessageRole`, `ChatTurn`)
//! - `repository`: repository trait for session persistence

mod message;
mod model;
mod repository;

pub use message::{ChatTurn, MessageRole};
pub use model::{PLACEHOLDER_DOCUMENT, Session};
pub use repository::SessionRepository;
