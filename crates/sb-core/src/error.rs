//! # AppError
//!
//! Centralized error handling for the Snippetbox ecosystem.
//! Callers branch on the variant, never on the message text.

use thiserror::Error;

/// The primary error type for all sb-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The request body could not be decoded (bad encoding, unparsable number).
    #[error("malformed client input: {0}")]
    ClientInput(String),

    /// Missing, expired, or unaddressable resource.
    #[error("resource not found")]
    NotFound,

    /// Signup attempted with an email that is already registered.
    #[error("email address is already in use")]
    DuplicateEmail,

    /// Unknown email or wrong password; the two cases are deliberately merged.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Infrastructure failure (database unreachable, query failed).
    #[error("storage error: {0}")]
    Storage(String),

    /// Anything else that should surface as a server error.
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    /// True for failures the caller caused and can correct.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::ClientInput(_) | Self::NotFound | Self::DuplicateEmail | Self::InvalidCredentials
        )
    }
}

/// A specialized Result type for Snippetbox logic.
pub type Result<T> = std::result::Result<T, AppError>;
