//! # Authentication Gate
//!
//! Per-request identity state and the proceed-or-redirect policy.
//!
//! ## Invariants
//! - `Authenticated` exists only as the product of a successful session
//!   resolution during the current request's evaluation
//! - Logout invalidates immediately; a replayed payload resolves to nothing

use crate::session::{SessionIdentityManager, SessionStorage};
use crate::store::{CredentialStore, UserRecord};

/// Identity state of the current request.
///
/// There is no persistent logged-in flag anywhere else; this value is
/// recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityState {
    Authenticated(UserRecord),
    Anonymous,
}

impl IdentityState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, IdentityState::Authenticated(_))
    }

    /// The resolved user, when authenticated.
    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            IdentityState::Authenticated(user) => Some(user),
            IdentityState::Anonymous => None,
        }
    }
}

/// What the HTTP layer should do with the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    RedirectToLogin,
}

/// The policy deciding whether a request proceeds or is sent to login.
pub struct AuthenticationGate;

impl AuthenticationGate {
    /// Evaluate this request's identity from its session storage.
    ///
    /// Any deserialize failure degrades to `Anonymous`; a broken session
    /// payload must not fail the request outright.
    pub fn resolve<S, T>(manager: &SessionIdentityManager<S>, storage: &T) -> IdentityState
    where
        S: CredentialStore,
        T: SessionStorage,
    {
        let payload = match storage.load() {
            Some(payload) => payload,
            None => return IdentityState::Anonymous,
        };

        match manager.deserialize(&payload) {
            Ok(user) => IdentityState::Authenticated(user),
            Err(err) => {
                tracing::debug!(error = %err, "session resolution failed, treating as anonymous");
                IdentityState::Anonymous
            }
        }
    }

    /// Gate a protected route on the resolved state.
    pub fn require_authenticated(state: &IdentityState) -> GateDecision {
        if state.is_authenticated() {
            GateDecision::Proceed
        } else {
            GateDecision::RedirectToLogin
        }
    }

    /// Log the browser session out.
    ///
    /// Invalidates the payload at the external storage boundary. The
    /// transition to `Anonymous` is immediate and irreversible for this
    /// session; non-replay is enforced by deletion in session storage.
    pub fn logout<T: SessionStorage>(storage: &mut T) -> IdentityState {
        storage.invalidate();
        IdentityState::Anonymous
    }
}
