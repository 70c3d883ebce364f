//! User domain model.

use serde::{Deserialize, Serialize};

/// A locally signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

impl User {
    /// Builds a user record from an email address.
    ///
    /// The display name is the local part of the address and the avatar
    /// is a deterministic placeholder image URL.
    pub fn from_email(email: impl Into<String>) -> Self {
        let email = email.into();
        let name = email
            .split('@')
            .next()
            .unwrap_or(email.as_str())
            .to_string();
        let avatar = format!(
            "https://ui-avatars.com/api/?name={email}&background=0D8ABC&color=fff"
        );
        Self {
            id: format!("user_{}", crate::instrument::random_token(9)),
            name,
            email,
            avatar,
        }
    }
}
