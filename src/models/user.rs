//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User identity record stored in the credential store.
///
/// Invariant: at most one trusted refresh token per user. Login and refresh
/// overwrite `refresh_token`; logout unsets it (the field is absent when
/// serialized, not null).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Document ID
    pub id: String,
    /// Unique username, stored lowercase
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Avatar asset URL (required at registration)
    pub avatar: String,
    /// Cover image asset URL (may be empty)
    pub cover_image: String,
    /// Argon2 PHC-format password hash
    pub password_hash: String,
    /// Current refresh token; absent when no session is trusted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Ordered list of watched video IDs, most recent last
    pub watch_history: Vec<String>,
    /// When the account was created (RFC 3339)
    pub created_at: String,
}

impl User {
    /// API projection of the record, excluding the password hash and the
    /// refresh token.
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            avatar: self.avatar.clone(),
            cover_image: self.cover_image.clone(),
            watch_history: self.watch_history.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

/// Sanitized user record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: String,
    pub watch_history: Vec<String>,
    pub created_at: String,
}
