//! Explicit session context shared by the gateway chain, interceptor and guard.

use super::store::{CredentialStore, StorageKey};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot of the authenticated session.
///
/// Validity is binary: a session is authenticated exactly when a non-empty
/// credential is present. There is no expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub credential: Option<String>,
    pub username: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }
}

/// Read side of the session.
///
/// Cloning is cheap; every clone observes the latest value published by the
/// single [`SessionWriter`].
#[derive(Clone, Debug)]
pub struct SessionContext {
    rx: watch::Receiver<Session>,
}

/// Write side of the session. Owned by the login/logout flow.
///
/// Not `Clone`: there is exactly one writer per context.
pub struct SessionWriter {
    tx: watch::Sender<Session>,
    store: Arc<dyn CredentialStore>,
}

impl SessionContext {
    /// Opens a session backed by `store`, seeding it with whatever the store
    /// already holds.
    pub fn open(store: Arc<dyn CredentialStore>) -> Result<(SessionContext, SessionWriter)> {
        let initial = Session {
            credential: non_empty(store.get(StorageKey::Token)?),
            username: non_empty(store.get(StorageKey::Username)?),
        };
        tracing::debug!(
            "[Session] Opened (authenticated: {})",
            initial.is_authenticated()
        );

        let (tx, rx) = watch::channel(initial);
        Ok((SessionContext { rx }, SessionWriter { tx, store }))
    }

    /// Returns a copy of the current session.
    pub fn current(&self) -> Session {
        self.rx.borrow().clone()
    }

    /// Returns the current credential, if any.
    pub fn credential(&self) -> Option<String> {
        self.rx.borrow().credential.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.rx.borrow().is_authenticated()
    }

    /// Returns a receiver that is notified on every sign-in and sign-out.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.rx.clone()
    }
}

impl SessionWriter {
    /// Persists a fresh session and publishes it.
    ///
    /// # Arguments
    ///
    /// * `credential` - Opaque bearer credential
    /// * `username` - Plain username, stored under `username`
    /// * `login_form` - Submitted form serialized as JSON text, stored under `user`
    pub fn sign_in(
        &self,
        credential: &str,
        username: Option<&str>,
        login_form: Option<&str>,
    ) -> Result<()> {
        self.store.set(StorageKey::Token, credential)?;
        match username {
            Some(name) => self.store.set(StorageKey::Username, name)?,
            None => self.store.remove(StorageKey::Username)?,
        }
        if let Some(form) = login_form {
            self.store.set(StorageKey::User, form)?;
        }

        self.tx.send_replace(Session {
            credential: non_empty(Some(credential.to_string())),
            username: username.map(str::to_string),
        });
        tracing::info!("[Session] Signed in as {}", username.unwrap_or("<unknown>"));
        Ok(())
    }

    /// Clears every stored key and publishes an empty session.
    pub fn sign_out(&self) -> Result<()> {
        self.store.clear()?;
        let previous = self.tx.send_replace(Session::default());
        if previous.is_authenticated() {
            tracing::info!("[Session] Signed out");
        }
        Ok(())
    }

    /// Caches the profile returned by the backend under `infoUser`.
    pub fn cache_profile(&self, profile_json: &str) -> Result<()> {
        self.store.set(StorageKey::InfoUser, profile_json)
    }

    /// Reads the cached profile, if any.
    pub fn cached_profile(&self) -> Result<Option<String>> {
        self.store.get(StorageKey::InfoUser)
    }

    /// Returns a read handle observing this writer.
    pub fn context(&self) -> SessionContext {
        SessionContext {
            rx: self.tx.subscribe(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
