//! # Session Identity
//!
//! Serializes an authenticated identity into an opaque payload at login
//! and turns that payload back into a full user record on each later
//! request.
//!
//! ## Invariants
//! - Payloads never contain password material
//! - `deserialize(serialize(t))` resolves the user whose id is `t.user_id`
//! - Every deserialize performs a fresh store lookup; nothing is cached
//!   here, so each authenticated request costs one lookup

use std::sync::Arc;

use serde_json::json;

use crate::errors::DeserializeError;
use crate::store::{CredentialStore, UserRecord};
use crate::strategy::IdentityToken;

/// Opaque serialized form of an `IdentityToken`, held by external session
/// storage keyed by the browser cookie.
///
/// The canonical shape is the JSON object `{"user_id":<n>}`; nothing else
/// parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPayload(String);

impl SessionPayload {
    /// Wrap a raw payload value as read back from session storage.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Two-phase identity resolution: opaque id in the cookie, full record on
/// demand.
///
/// The HTTP layer calls `deserialize` once per incoming authenticated
/// request. Callers wanting to cut the per-request lookup must layer
/// their own cache.
pub struct SessionIdentityManager<S: CredentialStore> {
    store: Arc<S>,
}

impl<S: CredentialStore> SessionIdentityManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Serialize an identity into the canonical payload shape.
    ///
    /// Pure and deterministic; the payload carries the user id and
    /// nothing else.
    pub fn serialize(&self, token: IdentityToken) -> SessionPayload {
        SessionPayload(json!({ "user_id": token.user_id }).to_string())
    }

    /// Resolve a payload back to its user record.
    ///
    /// Only `{id, username, email}` are fetched; the password hash never
    /// travels this path. A vanished user is an authentication failure,
    /// not a crash.
    pub fn deserialize(&self, payload: &SessionPayload) -> Result<UserRecord, DeserializeError> {
        let token: IdentityToken =
            serde_json::from_str(payload.as_str()).map_err(|_| DeserializeError::Malformed)?;

        match self.store.find_by_id(token.user_id) {
            Ok(Some(record)) => Ok(record),
            Ok(None) => {
                tracing::warn!(user_id = token.user_id, "session names a vanished user");
                Err(DeserializeError::NotFound)
            }
            Err(err) => {
                tracing::warn!(error = %err, "store failure during session resolution");
                Err(DeserializeError::Store(err))
            }
        }
    }
}

/// External per-browser session storage boundary.
///
/// One payload slot per browser session, keyed by the cookie upstream of
/// this crate. `invalidate` must delete the payload outright: a replayed
/// cookie after logout then finds nothing to load.
pub trait SessionStorage: Send + Sync {
    /// Current payload for this browser session, if any.
    fn load(&self) -> Option<SessionPayload>;

    /// Store the payload produced at login.
    fn store(&mut self, payload: SessionPayload);

    /// Delete the payload. Irreversible for this browser session.
    fn invalidate(&mut self);
}

/// In-memory session storage for tests and single-process embedding.
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    slot: Option<SessionPayload>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn load(&self) -> Option<SessionPayload> {
        self.slot.clone()
    }

    fn store(&mut self, payload: SessionPayload) {
        self.slot = Some(payload);
    }

    fn invalidate(&mut self) {
        self.slot = None;
    }
}
