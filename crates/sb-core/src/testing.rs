//! In-memory implementations of the ports, for tests in any crate.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{NewSnippet, NewUser, Snippet, User};
use crate::traits::{CredentialHasher, SnippetRepo, UserRepo};

pub use crate::traits::{MockCredentialHasher, MockSnippetRepo, MockUserRepo};

#[derive(Debug, Default)]
pub struct MemorySnippetRepo {
    rows: Mutex<Vec<Snippet>>,
}

impl MemorySnippetRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully-formed row, bypassing id assignment.
    pub fn seed(&self, snippet: Snippet) {
        self.rows.lock().unwrap().push(snippet);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SnippetRepo for MemorySnippetRepo {
    async fn insert(&self, snippet: NewSnippet) -> Result<i64> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        rows.push(Snippet {
            id,
            title: snippet.title,
            content: snippet.content,
            created: snippet.created,
            expires: snippet.expires,
        });
        Ok(id)
    }

    async fn get(&self, id: i64, now: DateTime<Utc>) -> Result<Snippet> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id && s.is_live(now))
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn latest(&self, now: DateTime<Utc>, limit: u32) -> Result<Vec<Snippet>> {
        let mut live: Vec<Snippet> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.is_live(now))
            .cloned()
            .collect();
        live.sort_by(|a, b| b.id.cmp(&a.id));
        live.truncate(limit as usize);
        Ok(live)
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserRepo {
    rows: Mutex<Vec<User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn insert(&self, user: NewUser) -> Result<i64> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }
        let id = rows.len() as i64 + 1;
        rows.push(User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created: user.created,
        });
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.rows.lock().unwrap().iter().any(|u| u.id == id))
    }
}

/// Reversible stand-in for a real hasher. Fast, and useless outside tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeHasher;

const FAKE_PREFIX: &[u8] = b"fake$";

#[async_trait]
impl CredentialHasher for FakeHasher {
    async fn hash(&self, password: &str) -> Result<Vec<u8>> {
        Ok([FAKE_PREFIX, password.as_bytes()].concat())
    }

    async fn verify(&self, password: &str, hash: &[u8]) -> bool {
        hash.strip_prefix(FAKE_PREFIX) == Some(password.as_bytes())
    }

    async fn verify_decoy(&self, _password: &str) {}
}
