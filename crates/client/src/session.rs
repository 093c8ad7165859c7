//! Observable client session store.
//!
//! [`SessionStore`] owns the persisted [`SessionRecord`] for one session kind
//! and publishes every change through a `tokio::sync::watch` channel, so views
//! and request interceptors see a login or logout immediately. The store never
//! talks to the network and never checks token freshness; an expired token
//! stays "present" until the server rejects it.

use std::sync::Arc;

use evendiona_core::roles::Role;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::ClientError;
use crate::storage::KeyValueStorage;

/// Storage key for the admin session record.
pub const ADMIN_SESSION_KEY: &str = "adminUser";
/// Storage key for the shopper session record.
pub const USER_SESSION_KEY: &str = "user";

/// Which session namespace a store manages. Each kind has its own key, and
/// at most one record lives under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Admin,
    User,
}

impl SessionKind {
    pub fn storage_key(self) -> &'static str {
        match self {
            SessionKind::Admin => ADMIN_SESSION_KEY,
            SessionKind::User => USER_SESSION_KEY,
        }
    }
}

/// The client-owned cache of an issued token and who it was issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub identity: String,
    pub role: Role,
}

impl SessionRecord {
    pub fn admin(identity: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            identity: identity.into(),
            role: Role::Admin,
        }
    }
}

/// Session state holder injected into the view layer.
///
/// Cloning is cheap and every clone shares the same state and subscribers.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    kind: SessionKind,
    state: Arc<watch::Sender<Option<SessionRecord>>>,
}

impl SessionStore {
    /// Create a store and hydrate it from storage once.
    pub fn new(storage: Arc<dyn KeyValueStorage>, kind: SessionKind) -> Self {
        let initial = read_record(storage.as_ref(), kind);
        let (state, _) = watch::channel(initial);
        Self {
            storage,
            kind,
            state: Arc::new(state),
        }
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    /// The in-memory record as of the last login, logout, or reload.
    pub fn current(&self) -> Option<SessionRecord> {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|r| r.token.clone())
    }

    /// Persist `record`, replacing any previous one, and notify subscribers.
    pub fn login(&self, record: SessionRecord) -> Result<(), ClientError> {
        let raw = serde_json::to_string(&record).map_err(|e| ClientError::Storage(e.to_string()))?;
        self.storage.set(self.kind.storage_key(), raw)?;
        tracing::debug!(identity = %record.identity, role = %record.role, "Session stored");
        self.state.send_replace(Some(record));
        Ok(())
    }

    /// Remove the persisted record and clear in-memory state.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.storage.remove(self.kind.storage_key())?;
        tracing::debug!(key = self.kind.storage_key(), "Session cleared");
        self.state.send_replace(None);
        Ok(())
    }

    /// Re-read storage, e.g. after another process wrote to it.
    pub fn reload(&self) -> Option<SessionRecord> {
        let record = read_record(self.storage.as_ref(), self.kind);
        self.state.send_replace(record.clone());
        record
    }

    /// Subscribe to session changes. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionRecord>> {
        self.state.subscribe()
    }
}

/// Read and decode the record for `kind`. Malformed content reads as logged out.
fn read_record(storage: &dyn KeyValueStorage, kind: SessionKind) -> Option<SessionRecord> {
    let raw = storage.get(kind.storage_key())?;
    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(key = kind.storage_key(), error = %e, "Ignoring malformed session record");
            None
        }
    }
}
