//! # Credential Hashing
//!
//! One-way password hashing and verification using Argon2id.
//!
//! The PHC string output embeds algorithm, version, parameters, and salt,
//! so stored digests stay verifiable after the work factor changes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

use crate::errors::{AuthError, AuthResult};

/// Default hashing rounds (Argon2id iteration count).
pub const DEFAULT_WORK_FACTOR: u32 = 10;

// Memory and lane parameters are fixed; the work factor is the one
// tunable cost knob.
const MEMORY_KIB: u32 = 19_456;
const LANES: u32 = 1;

/// Hashing cost configuration
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Iteration count. Digests embed the count they were produced with,
    /// so raising it later leaves existing digests verifiable.
    pub work_factor: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            work_factor: DEFAULT_WORK_FACTOR,
        }
    }
}

/// Rejected hasher configuration. Fatal at startup, never per-request.
#[derive(Debug, Clone, Error)]
#[error("invalid hasher configuration: {0}")]
pub struct HasherConfigError(String);

/// Salted, slow password hasher with a configurable work factor.
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Build a hasher, validating the configured cost once.
    pub fn new(config: HasherConfig) -> Result<Self, HasherConfigError> {
        let params = Params::new(MEMORY_KIB, config.work_factor, LANES, None)
            .map_err(|e| HasherConfigError(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Two calls on the same password produce two different digests; both
    /// verify.
    pub fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::HashingFailed)
    }

    /// Verify a password against a stored digest.
    ///
    /// Re-derives with the parameters embedded in the digest and compares
    /// in constant time (argon2 crate guarantee). A digest that does not
    /// parse never verifies.
    pub fn verify(&self, plaintext: &str, digest: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(digest).map_err(|_| AuthError::InvalidCredentials)?;

        Ok(self
            .argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}
