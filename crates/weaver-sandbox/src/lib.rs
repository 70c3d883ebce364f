//! Isolated preview context for SiteWeaver.
//!
//! The preview document runs in an execution context that cannot touch
//! host memory; host and preview exchange state only through the message
//! protocol in `weaver_core::protocol`. This crate provides that isolated
//! side as a headless actor: it holds the rendered (instrumented)
//! document, resolves pointer presses to nodes, applies update commands,
//! and reports selections and full-document changes back to the host —
//! the same observable behavior the injected agent script provides inside
//! a real browser embedding.

mod actor;
mod dom;
mod sandbox;

pub use actor::{SandboxHandle, spawn};
pub use sandbox::PreviewSandbox;
