//! User identity module.
//!
//! The "login" here is a local display-name stub: it exists so sessions
//! have an owner to show, not to provide any security.

mod model;
mod service;

pub use model::User;
pub use service::UserService;
