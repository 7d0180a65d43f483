//! snippetbox/crates/sb-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Snippetbox:
//! models, ports, validation, form decoding, and the services on top.

pub mod error;
pub mod form;
pub mod forms;
pub mod models;
pub mod services;
pub mod traits;
pub mod validator;

#[cfg(feature = "testing")]
pub mod testing;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use services::{SnippetService, UserService};
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use chrono::{Duration, Utc};

    #[test]
    fn snippet_is_live_until_expiry() {
        let created = Utc::now();
        let snippet = Snippet {
            id: 1,
            title: "O snail".to_string(),
            content: "Climb Mount Fuji,\nBut slowly, slowly!".to_string(),
            created,
            expires: created + Duration::days(1),
        };
        assert!(snippet.is_live(created));
        assert!(!snippet.is_live(snippet.expires));
    }

    #[test]
    fn user_debug_redacts_the_hash() {
        let user = User {
            id: 1,
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: b"secret-hash".to_vec(),
            created: Utc::now(),
        };
        let printed = format!("{user:?}");
        assert!(printed.contains("alice@example.com"));
        assert!(!printed.contains("secret-hash"));
    }
}
