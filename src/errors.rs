//! # Auth Errors
//!
//! Error types for the authentication core.

use std::fmt;

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Which unique column a registration collided on.
///
/// `Unspecified` covers stores that report a uniqueness violation without
/// naming the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Username,
    Email,
    Unspecified,
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateField::Username => write!(f, "username"),
            DuplicateField::Email => write!(f, "email"),
            DuplicateField::Unspecified => write!(f, "credential"),
        }
    }
}

/// Errors surfaced by the credential store boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("unique constraint violated on {0}")]
    UniqueViolation(DuplicateField),

    /// Connectivity or I/O failure reaching the store.
    #[error("credential store unavailable: {0}")]
    Io(String),
}

/// Authentication and registration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    // ==================
    // Authentication Errors
    // ==================
    /// No credential stored under the submitted username. Internal result
    /// only; render it through `public_message` so callers cannot probe
    /// which usernames exist.
    #[error("user not found")]
    UserNotFound,

    /// The password did not match the stored digest.
    #[error("invalid credentials")]
    InvalidCredentials,

    // ==================
    // Registration Errors
    // ==================
    /// Username or email already registered.
    #[error("{0} already registered")]
    DuplicateCredential(DuplicateField),

    /// The credential row was inserted but the store never reported the
    /// new identity. The row exists; reconciliation is manual.
    #[error("registration applied but the new identity was not returned: {0}")]
    RegistrationUnresolved(String),

    // ==================
    // Internal Errors
    // ==================
    /// Password hashing failed
    #[error("internal error: password hashing failed")]
    HashingFailed,

    /// A store failure that is not a credential problem. Never collapsed
    /// into `InvalidCredentials`; an outage must not read as a bad
    /// password.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(field) => AuthError::DuplicateCredential(field),
            other => AuthError::Store(other),
        }
    }
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 401 Unauthorized
            AuthError::UserNotFound => 401,
            AuthError::InvalidCredentials => 401,

            // 409 Conflict
            AuthError::DuplicateCredential(_) => 409,

            // 500 Internal Server Error
            AuthError::RegistrationUnresolved(_) => 500,
            AuthError::HashingFailed => 500,
            AuthError::Store(_) => 500,
        }
    }

    /// Returns whether this error should be logged at warn level
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Message safe to render to an end user.
    ///
    /// `UserNotFound` and `InvalidCredentials` share one generic message so
    /// login responses cannot be used to enumerate accounts.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::UserNotFound | AuthError::InvalidCredentials => {
                "Invalid username or password"
            }
            AuthError::DuplicateCredential(_) => "Username or email already registered",
            AuthError::RegistrationUnresolved(_)
            | AuthError::HashingFailed
            | AuthError::Store(_) => "Something went wrong, please try again",
        }
    }
}

/// Failure to turn a session payload back into a user record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeserializeError {
    /// The payload did not parse as a session identity.
    #[error("malformed session payload")]
    Malformed,

    /// The payload names a user that no longer exists.
    #[error("no user for session identity")]
    NotFound,

    /// Store failure during the lookup.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
