//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.
//! Each has a real adapter (sb-db-sqlite, sb-auth-simple) and, with the
//! `testing` feature, an in-memory fake and a mockall mock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{NewSnippet, NewUser, Snippet, User};

/// Data persistence contract for snippets.
///
/// Expiry is enforced on read: `get` and `latest` must never return a
/// snippet whose `expires` is not after `now`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SnippetRepo: Send + Sync {
    /// Persists the snippet and returns the server-generated id.
    async fn insert(&self, snippet: NewSnippet) -> Result<i64>;

    /// Fails with `AppError::NotFound` for unknown or expired ids.
    async fn get(&self, id: i64, now: DateTime<Utc>) -> Result<Snippet>;

    /// Newest first, at most `limit` rows.
    async fn latest(&self, now: DateTime<Utc>, limit: u32) -> Result<Vec<Snippet>>;
}

/// Data persistence contract for user accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `AppError::DuplicateEmail` when the unique constraint trips.
    async fn insert(&self, user: NewUser) -> Result<i64>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn exists(&self, id: i64) -> Result<bool>;
}

/// Slow, salted one-way password hashing.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Produces a self-describing encoded hash (salt and parameters included).
    async fn hash(&self, password: &str) -> Result<Vec<u8>>;

    /// Verifies a password against a stored hash. Malformed hashes never verify.
    async fn verify(&self, password: &str, hash: &[u8]) -> bool;

    /// Burns the same work as `verify` against a throwaway hash, so a lookup
    /// miss costs as much time as a wrong password.
    async fn verify_decoy(&self, password: &str);
}
