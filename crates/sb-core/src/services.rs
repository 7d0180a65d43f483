//! # Services
//!
//! Thin orchestration over the storage and hashing ports. Handlers talk to
//! these, never to the repos directly.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::error::{AppError, Result};
use crate::models::{NewSnippet, NewUser, Snippet};
use crate::traits::{CredentialHasher, SnippetRepo, UserRepo};

/// How many snippets the home page lists.
pub const LATEST_LIMIT: u32 = 10;

#[derive(Clone)]
pub struct SnippetService {
    repo: Arc<dyn SnippetRepo>,
}

impl SnippetService {
    pub fn new(repo: Arc<dyn SnippetRepo>) -> Self {
        Self { repo }
    }

    /// Stores a snippet that expires `expiry_days` from now.
    pub async fn insert(&self, title: &str, content: &str, expiry_days: i32) -> Result<i64> {
        if expiry_days < 1 {
            return Err(AppError::internal(format!(
                "expiry must be positive, got {expiry_days} days"
            )));
        }
        let created = Utc::now();
        let expires = Duration::try_days(i64::from(expiry_days))
            .and_then(|ttl| created.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::internal(format!("expiry of {expiry_days} days is out of range"))
            })?;
        let snippet = NewSnippet {
            title: title.to_owned(),
            content: content.to_owned(),
            created,
            expires,
        };
        let id = self.repo.insert(snippet).await?;
        tracing::debug!(snippet_id = id, expiry_days, "snippet stored");
        Ok(id)
    }

    pub async fn get(&self, id: i64) -> Result<Snippet> {
        if id < 1 {
            return Err(AppError::NotFound);
        }
        self.repo.get(id, Utc::now()).await
    }

    /// Unexpired snippets, newest first.
    pub async fn latest(&self) -> Result<Vec<Snippet>> {
        self.repo.latest(Utc::now(), LATEST_LIMIT).await
    }
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepo>,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepo>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { repo, hasher }
    }

    /// Registers a new account. `AppError::DuplicateEmail` if the email is taken.
    pub async fn insert(&self, name: &str, email: &str, password: &str) -> Result<i64> {
        let password_hash = self.hasher.hash(password).await?;
        let id = self
            .repo
            .insert(NewUser {
                name: name.to_owned(),
                email: email.to_owned(),
                password_hash,
                created: Utc::now(),
            })
            .await?;
        tracing::info!(user_id = id, "user registered");
        Ok(id)
    }

    /// Returns the user's id when the email/password pair checks out.
    ///
    /// Unknown email and wrong password both yield `AppError::InvalidCredentials`,
    /// and both pay for one hash verification.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<i64> {
        let Some(user) = self.repo.find_by_email(email).await? else {
            self.hasher.verify_decoy(password).await;
            return Err(AppError::InvalidCredentials);
        };

        if self.hasher.verify(password, &user.password_hash).await {
            Ok(user.id)
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    pub async fn exists(&self, id: i64) -> Result<bool> {
        self.repo.exists(id).await
    }
}
