//! # Credential Store
//!
//! Data model and the storage capability the strategies consume. The store
//! itself is external; this module defines the narrow interface plus an
//! in-memory implementation for tests and single-process embedding.
//!
//! ## Invariants
//! - Username and email are unique keys
//! - Ids are store-assigned, immutable, unique
//! - `UserRecord` never carries the password hash

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DuplicateField, StoreError};

/// Store-assigned numeric identity.
pub type UserId = i64;

/// A credential ready to insert. `password_hash` is always a digest,
/// never the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCredential {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// A stored credential row as read back for verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: UserId,

    pub username: String,

    pub email: String,

    /// Argon2id digest (never plaintext, never serialized back out)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Store-assigned at insert
    pub created_at: DateTime<Utc>,
}

/// The session-safe projection of a user: structurally incapable of
/// carrying the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Outcome of a successful insert.
#[derive(Debug, Clone, Copy)]
pub struct InsertReceipt {
    /// The generated key, when the backend reports it on insert. Backends
    /// that cannot leave this `None`; callers then fall back to
    /// `last_insert_id`.
    pub new_id: Option<UserId>,
}

/// Narrow storage interface consumed by the core.
///
/// Implementations must serialize conflicting writes: of two concurrent
/// inserts with the same username, at most one succeeds and the other
/// observes `StoreError::UniqueViolation`.
pub trait CredentialStore: Send + Sync {
    /// Full credential row for password verification.
    fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError>;

    /// Session-safe lookup: id, username, and email only.
    fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a new credential. Username and email are unique keys; a
    /// collision surfaces as `StoreError::UniqueViolation` naming the
    /// field where the backend can distinguish it.
    fn insert(&self, credential: NewCredential) -> Result<InsertReceipt, StoreError>;

    /// Identity of this actor's most recent insert (read-your-writes).
    fn last_insert_id(&self) -> Result<Option<UserId>, StoreError>;
}

#[derive(Debug, Default)]
struct Rows {
    rows: Vec<Credential>,
    next_id: UserId,
    last_insert: Option<UserId>,
}

/// In-memory credential store for tests and single-process embedding.
///
/// A single logical actor: `last_insert_id` reflects the most recent
/// insert through this handle.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Rows>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Io("lock poisoned".to_string())
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.rows.iter().find(|c| c.username == username).cloned())
    }

    fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.rows.iter().find(|c| c.id == id).map(|c| UserRecord {
            id: c.id,
            username: c.username.clone(),
            email: c.email.clone(),
        }))
    }

    fn insert(&self, credential: NewCredential) -> Result<InsertReceipt, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        if inner.rows.iter().any(|c| c.username == credential.username) {
            return Err(StoreError::UniqueViolation(DuplicateField::Username));
        }
        if inner.rows.iter().any(|c| c.email == credential.email) {
            return Err(StoreError::UniqueViolation(DuplicateField::Email));
        }

        inner.next_id += 1;
        let id = inner.next_id;

        inner.rows.push(Credential {
            id,
            username: credential.username,
            email: credential.email,
            password_hash: credential.password_hash,
            created_at: Utc::now(),
        });
        inner.last_insert = Some(id);

        Ok(InsertReceipt { new_id: Some(id) })
    }

    fn last_insert_id(&self) -> Result<Option<UserId>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.last_insert)
    }
}
