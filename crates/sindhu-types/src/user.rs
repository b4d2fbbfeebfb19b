//! User types

use serde::{Deserialize, Serialize};

/// Stored account. The password is whatever the caller stored (the server
/// stores an argon2 hash) and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

impl User {
    pub fn from_new(id: i64, new: NewUser) -> Self {
        Self {
            id,
            username: new.username,
            password: new.password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}
