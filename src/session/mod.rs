//! Session persistence and state for the admin console.
//!
//! Exactly two records make up a session: the opaque API token and a cached
//! snapshot of the signed-in user. They are written and cleared together;
//! callers must never observe one without the other after a completed login.

pub mod backend;
pub mod guards;
pub mod state;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use state::SessionState;

use crate::api::types::User;
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::debug;

const TOKEN_KEY: &str = "auth_token";
const USER_KEY: &str = "user_data";

/// Typed access to the two session records over an injectable backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn StorageBackend>,
}

impl SessionStore {
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Store the API token. An empty token clears the record instead; both
    /// forms are idempotent.
    ///
    /// # Errors
    /// Returns an error if the backend write fails.
    pub fn set_token(&self, token: &SecretString) -> Result<()> {
        let raw = token.expose_secret();
        if raw.is_empty() {
            return self.backend.remove(TOKEN_KEY);
        }
        self.backend.set(TOKEN_KEY, raw)
    }

    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.backend
            .get(TOKEN_KEY)
            .filter(|raw| !raw.is_empty())
            .map(SecretString::from)
    }

    /// # Errors
    /// Returns an error if the user cannot be encoded or the write fails.
    pub fn set_user(&self, user: &User) -> Result<()> {
        let encoded = serde_json::to_string(user)?;
        self.backend.set(USER_KEY, &encoded)
    }

    /// Read the cached user. An unparsable record is treated as no cached
    /// user; the server remains the source of truth for the profile.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        let raw = self.backend.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                debug!("Discarding unreadable cached user record: {err}");
                None
            }
        }
    }

    #[must_use]
    pub fn email(&self) -> String {
        self.user().map(|user| user.email).unwrap_or_default()
    }

    /// Store token and user as one durable write so a half-written session is
    /// never observable.
    ///
    /// # Errors
    /// Returns an error if the user cannot be encoded or the write fails.
    pub fn set_session(&self, token: &SecretString, user: &User) -> Result<()> {
        let encoded = serde_json::to_string(user)?;
        self.backend
            .set_many(&[(TOKEN_KEY, token.expose_secret()), (USER_KEY, &encoded)])
    }

    /// Remove both records in one durable write. Idempotent.
    ///
    /// # Errors
    /// Returns an error if the removal fails.
    pub fn clear(&self) -> Result<()> {
        self.backend.remove_many(&[TOKEN_KEY, USER_KEY])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Role, User};
    use anyhow::Result;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(MemoryBackend::new()))
    }

    fn sample_user() -> User {
        User {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: Some("+34 600 000 000".to_string()),
            profile_photo: None,
            is_active: Some(true),
            role: Some(Role {
                id: 1,
                name: "Administrator".to_string(),
                slug: "admin".to_string(),
                description: None,
            }),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn token_round_trips() -> Result<()> {
        let store = store();
        store.set_token(&SecretString::from("tok-1".to_string()))?;
        let token = store.token().map(|token| token.expose_secret().to_string());
        assert_eq!(token.as_deref(), Some("tok-1"));
        Ok(())
    }

    #[test]
    fn empty_token_clears_the_record() -> Result<()> {
        let store = store();
        store.set_token(&SecretString::from("tok-1".to_string()))?;
        store.set_token(&SecretString::from(String::new()))?;
        assert!(store.token().is_none());
        Ok(())
    }

    #[test]
    fn user_round_trips() -> Result<()> {
        let store = store();
        let user = sample_user();
        store.set_user(&user)?;
        assert_eq!(store.user(), Some(user));
        assert_eq!(store.email(), "ada@example.com");
        Ok(())
    }

    #[test]
    fn tampered_user_record_reads_as_none() -> Result<()> {
        let backend = Arc::new(MemoryBackend::new());
        backend.set(USER_KEY, "{not json")?;
        let store = SessionStore::new(backend);
        assert_eq!(store.user(), None);
        assert_eq!(store.email(), "");
        Ok(())
    }

    #[test]
    fn clear_is_idempotent() -> Result<()> {
        let store = store();
        store.set_session(&SecretString::from("tok-1".to_string()), &sample_user())?;
        store.clear()?;
        store.clear()?;
        assert!(store.token().is_none());
        assert!(store.user().is_none());
        Ok(())
    }
}
