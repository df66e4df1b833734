//! # Auth Service
//!
//! The facade the HTTP layer talks to: an injected credential store, the
//! hasher, and the session identity manager behind one handle.

use std::sync::Arc;

use crate::errors::AuthResult;
use crate::hasher::CredentialHasher;
use crate::session::SessionIdentityManager;
use crate::store::CredentialStore;
use crate::strategy::{
    CredentialSubmission, IdentityToken, LoginRequest, LoginStrategy, RegisterRequest,
    RegisterStrategy,
};

/// Combined authentication service over an injected credential store.
///
/// All methods take `&self`; the service is safe to share across
/// concurrent requests, and hashing never holds a lock.
pub struct AuthService<S: CredentialStore> {
    store: Arc<S>,
    hasher: CredentialHasher,
    sessions: SessionIdentityManager<S>,
}

impl<S: CredentialStore> AuthService<S> {
    pub fn new(store: S, hasher: CredentialHasher) -> Self {
        let store = Arc::new(store);
        Self {
            sessions: SessionIdentityManager::new(Arc::clone(&store)),
            hasher,
            store,
        }
    }

    /// Verify a login submission.
    pub fn login(&self, request: &LoginRequest) -> AuthResult<IdentityToken> {
        LoginStrategy::new(self.store.as_ref(), &self.hasher).authenticate(request)
    }

    /// Register a new credential.
    pub fn register(&self, request: &RegisterRequest) -> AuthResult<IdentityToken> {
        RegisterStrategy::new(self.store.as_ref(), &self.hasher).register(request)
    }

    /// Dispatch a submission through the closed strategy set.
    pub fn submit(&self, submission: &CredentialSubmission) -> AuthResult<IdentityToken> {
        match submission {
            CredentialSubmission::Login(request) => self.login(request),
            CredentialSubmission::Register(request) => self.register(request),
        }
    }

    /// Session identity manager bound to the same store.
    pub fn sessions(&self) -> &SessionIdentityManager<S> {
        &self.sessions
    }
}
