//! gatehouse - Credential authentication and per-browser session identity
//!
//! This crate implements the authentication core only: salted slow
//! hashing, the login/registration strategy pair over an injected
//! credential store, and the session identity lifecycle (serialize on
//! login, deserialize on each authenticated request). HTTP routing,
//! the persistent store engine, and input-field validation are the
//! embedding application's collaborators.

pub mod errors;
pub mod gate;
pub mod hasher;
pub mod service;
pub mod session;
pub mod store;
pub mod strategy;

pub use errors::{AuthError, AuthResult, DeserializeError, DuplicateField, StoreError};
pub use gate::{AuthenticationGate, GateDecision, IdentityState};
pub use hasher::{CredentialHasher, HasherConfig, HasherConfigError};
pub use service::AuthService;
pub use session::{InMemorySessionStorage, SessionIdentityManager, SessionPayload, SessionStorage};
pub use store::{
    Credential, CredentialStore, InMemoryCredentialStore, InsertReceipt, NewCredential, UserId,
    UserRecord,
};
pub use strategy::{
    CredentialSubmission, IdentityToken, LoginRequest, LoginStrategy, RegisterRequest,
    RegisterStrategy,
};
