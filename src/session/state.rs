//! In-memory session state for the console. The service rehydrates from the
//! persistent store once at construction and is the single answer to "is a
//! user currently signed in". It performs no network I/O; only the auth flow
//! and the authorization pipeline mutate it.

use crate::api::types::User;
use crate::session::guards::LOGIN_ROUTE;
use crate::session::SessionStore;
use anyhow::Result;
use secrecy::SecretString;
use std::sync::{PoisonError, RwLock};
use tracing::warn;

#[derive(Default)]
struct Inner {
    authenticated: bool,
    user: Option<User>,
    pending_route: Option<&'static str>,
}

pub struct SessionState {
    store: SessionStore,
    inner: RwLock<Inner>,
}

impl SessionState {
    /// Build the service over a store, rehydrating any session that survived
    /// a previous run.
    #[must_use]
    pub fn new(store: SessionStore) -> Self {
        let authenticated = store.token().is_some();
        let user = if authenticated { store.user() } else { None };
        Self {
            store,
            inner: RwLock::new(Inner {
                authenticated,
                user,
                pending_route: None,
            }),
        }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .authenticated
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user
            .clone()
    }

    /// Commit a verified login: token and user land in the store together,
    /// then the in-memory view flips to authenticated.
    ///
    /// # Errors
    /// Returns an error if the store write fails; no partial session is kept.
    pub fn establish(&self, token: &SecretString, user: &User) -> Result<()> {
        self.store.set_session(token, user)?;
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.authenticated = true;
        inner.user = Some(user.clone());
        inner.pending_route = None;
        Ok(())
    }

    /// Drop the session after an authorization failure. The in-memory view is
    /// reset even if the store write fails, and the login route is recorded
    /// as the pending navigation target.
    pub fn invalidate(&self, notice: &str) {
        if let Err(err) = self.store.clear() {
            warn!("Failed to clear session records: {err}");
        }
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.authenticated = false;
        inner.user = None;
        inner.pending_route = Some(LOGIN_ROUTE);
        warn!("{notice}");
    }

    /// Clear the session on explicit logout.
    ///
    /// # Errors
    /// Returns an error if the store write fails; the in-memory view is
    /// already signed out by then.
    pub fn clear(&self) -> Result<()> {
        {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            inner.authenticated = false;
            inner.user = None;
            inner.pending_route = None;
        }
        self.store.clear()
    }

    /// Consume the pending navigation target, if any. The target is set once
    /// per invalidation and handed out once.
    #[must_use]
    pub fn take_redirect(&self) -> Option<&'static str> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .pending_route
            .take()
    }
}
