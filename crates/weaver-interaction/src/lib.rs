//! Generation collaborator for SiteWeaver.
//!
//! Talks to the Gemini REST API to turn user instructions (plus the
//! current document and chat history) into complete HTML documents.

mod gemini;

pub use gemini::GeminiGenerator;
