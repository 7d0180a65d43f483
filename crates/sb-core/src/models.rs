//! # Domain Models
//!
//! These structs represent the core entities of Snippetbox.
//! Identifiers are server-generated integers handed out by the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A titled text blob that stops being reachable once `expires` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    /// Always later than `created`.
    pub expires: DateTime<Utc>,
}

impl Snippet {
    /// Whether the snippet is still visible at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires > now
    }
}

/// Insert payload for a snippet; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

/// A registered account. Never mutated or deleted once created.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Unique, compared exactly as stored.
    pub email: String,
    /// Encoded output of the `CredentialHasher`; never the plaintext.
    #[serde(skip_serializing)]
    pub password_hash: Vec<u8>,
    pub created: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created", &self.created)
            .finish()
    }
}

/// Insert payload for a user; the password has already been hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: Vec<u8>,
    pub created: DateTime<Utc>,
}
