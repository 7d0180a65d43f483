//! # sb-auth-simple
//!
//! Argon2-based implementation of `CredentialHasher`.
//! Hashing is CPU-bound, so every call is moved onto tokio's blocking pool.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use sb_core::error::{AppError, Result};
use sb_core::traits::CredentialHasher;

/// Throwaway hash with the default Argon2id parameters; never matches.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Arc<Argon2<'static>>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    fn verify_blocking(argon2: &Argon2<'_>, password: &str, encoded: &[u8]) -> bool {
        let Ok(encoded) = std::str::from_utf8(encoded) else {
            tracing::warn!("stored password hash is not UTF-8");
            return false;
        };
        let parsed = match PasswordHash::new(encoded) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(error = %err, "stored password hash is malformed");
                return false;
            }
        };
        argon2.verify_password(password.as_bytes(), &parsed).is_ok()
    }
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    /// Returns the PHC string (`$argon2id$v=19$...`) as bytes.
    async fn hash(&self, password: &str) -> Result<Vec<u8>> {
        let argon2 = Arc::clone(&self.argon2);
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string().into_bytes())
                .map_err(AppError::internal)
        })
        .await
        .map_err(AppError::internal)?
    }

    async fn verify(&self, password: &str, hash: &[u8]) -> bool {
        let argon2 = Arc::clone(&self.argon2);
        let password = password.to_owned();
        let hash = hash.to_vec();
        tokio::task::spawn_blocking(move || Self::verify_blocking(&argon2, &password, &hash))
            .await
            .unwrap_or(false)
    }

    async fn verify_decoy(&self, password: &str) {
        self.verify(password, DECOY_HASH.as_bytes()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("validPa$$word").await.unwrap();

        assert!(String::from_utf8_lossy(&hash).starts_with("$argon2id$"));
        assert!(hasher.verify("validPa$$word", &hash).await);
        assert!(!hasher.verify("wrongPa$$word", &hash).await);
    }

    #[tokio::test]
    async fn test_salts_differ_per_hash() {
        let hasher = Argon2Hasher::new();
        let a = hasher.hash("same password").await.unwrap();
        let b = hasher.hash("same password").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_malformed_hashes_never_verify() {
        let hasher = Argon2Hasher::new();
        assert!(!hasher.verify("anything", b"not a phc string").await);
        assert!(!hasher.verify("anything", &[0xff, 0x00]).await);
    }

    #[test]
    fn test_decoy_is_a_well_formed_hash() {
        assert!(PasswordHash::new(DECOY_HASH).is_ok());
    }
}
