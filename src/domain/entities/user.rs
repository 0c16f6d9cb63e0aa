//! User entity for link ownership and authentication.

use chrono::{DateTime, Utc};

/// A registered user identified by email and username.
///
/// `password_hash` is a PHC-format Argon2id hash and must never be exposed
/// through the API surface.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for registering a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}
