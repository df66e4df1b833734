//! # Login and Registration Strategies
//!
//! The closed pair of credential strategies. Each borrows an injected
//! store and hasher; no state is shared between in-flight calls, so
//! concurrent submissions for different usernames never contend.

use serde::{Deserialize, Serialize};

use crate::errors::{AuthError, AuthResult};
use crate::hasher::CredentialHasher;
use crate::store::{CredentialStore, NewCredential, UserId};

/// Minimal authenticated-identity value handed to the session layer.
///
/// Carries the store-assigned id and nothing else; password material
/// never enters this type. Created fresh at each successful login or
/// registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityToken {
    pub user_id: UserId,
}

/// Login form payload.
///
/// Assumed already format-validated upstream; arbitrary strings,
/// including empty, are tolerated here.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registration form payload, pre-validated upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// The closed set of credential submissions.
///
/// Dispatch happens by variant, not by name; there is no open-ended
/// strategy registration.
#[derive(Debug, Clone)]
pub enum CredentialSubmission {
    Login(LoginRequest),
    Register(RegisterRequest),
}

/// Verifies a username/password pair against the store.
pub struct LoginStrategy<'a, S: CredentialStore> {
    store: &'a S,
    hasher: &'a CredentialHasher,
}

impl<'a, S: CredentialStore> LoginStrategy<'a, S> {
    pub fn new(store: &'a S, hasher: &'a CredentialHasher) -> Self {
        Self { store, hasher }
    }

    /// Authenticate a submitted username/password pair.
    ///
    /// A store failure surfaces as `AuthError::Store`, never folded into
    /// `InvalidCredentials`: an outage must not read as a bad password.
    pub fn authenticate(&self, request: &LoginRequest) -> AuthResult<IdentityToken> {
        let credential = match self.store.find_by_username(&request.username)? {
            Some(credential) => credential,
            None => {
                // Unknown username: no hashing work is done.
                tracing::debug!(user = %request.username, "login rejected: unknown username");
                return Err(AuthError::UserNotFound);
            }
        };

        if self.hasher.verify(&request.password, &credential.password_hash)? {
            Ok(IdentityToken {
                user_id: credential.id,
            })
        } else {
            tracing::debug!(user = %request.username, "login rejected: password mismatch");
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Hashes, inserts, and resolves the identity of a new credential.
pub struct RegisterStrategy<'a, S: CredentialStore> {
    store: &'a S,
    hasher: &'a CredentialHasher,
}

impl<'a, S: CredentialStore> RegisterStrategy<'a, S> {
    pub fn new(store: &'a S, hasher: &'a CredentialHasher) -> Self {
        Self { store, hasher }
    }

    /// Register a new credential.
    ///
    /// Stages short-circuit in order: a hashing failure creates no row,
    /// and a uniqueness violation surfaces as `DuplicateCredential`. An
    /// inserted row whose id cannot be resolved is the degraded-success
    /// case — the row exists without a returned identity.
    pub fn register(&self, request: &RegisterRequest) -> AuthResult<IdentityToken> {
        let password_hash = self.hasher.hash(&request.password)?;

        let receipt = self.store.insert(NewCredential {
            username: request.username.clone(),
            email: request.email.clone(),
            password_hash,
        })?;

        let user_id = match receipt.new_id {
            Some(id) => id,
            None => self.resolve_inserted_id()?,
        };

        tracing::info!(user_id, user = %request.username, "credential registered");
        Ok(IdentityToken { user_id })
    }

    // The row is already durable here; failures are degraded success,
    // not plain store errors.
    fn resolve_inserted_id(&self) -> AuthResult<UserId> {
        match self.store.last_insert_id() {
            Ok(Some(id)) => Ok(id),
            Ok(None) => Err(AuthError::RegistrationUnresolved(
                "store reported no last-insert id".to_string(),
            )),
            Err(err) => Err(AuthError::RegistrationUnresolved(err.to_string())),
        }
    }
}
