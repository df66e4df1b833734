//! Authentication Flow Tests
//!
//! End-to-end coverage of the credential protocol:
//! - Register, then log in with the same identity
//! - Wrong password and unknown username stay distinct internally but
//!   render identically to the end user
//! - A store outage is never reported as a credential failure
//! - The serialized session resolves the registered user with no
//!   password material anywhere in the path

use gatehouse::{
    AuthError, AuthService, AuthenticationGate, CredentialHasher, CredentialSubmission,
    GateDecision, HasherConfig, InMemoryCredentialStore, InMemorySessionStorage, LoginRequest,
    RegisterRequest, SessionStorage, StoreError,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn service() -> AuthService<InMemoryCredentialStore> {
    AuthService::new(
        InMemoryCredentialStore::new(),
        CredentialHasher::new(HasherConfig { work_factor: 2 }).unwrap(),
    )
}

fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn login(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

// =============================================================================
// Register / Login Scenario
// =============================================================================

/// The full scenario: register, log in, reject a wrong password, resolve
/// the session back to the user record.
#[test]
fn test_register_login_session_scenario() {
    let service = service();

    let registered = service
        .register(&register("alice", "a@x.com", "Str0ng!Pass"))
        .unwrap();

    let logged_in = service.login(&login("alice", "Str0ng!Pass")).unwrap();
    assert_eq!(logged_in, registered);

    let result = service.login(&login("alice", "wrong"));
    assert_eq!(result, Err(AuthError::InvalidCredentials));

    let payload = service.sessions().serialize(logged_in);
    let record = service.sessions().deserialize(&payload).unwrap();
    assert_eq!(record.id, registered.user_id);
    assert_eq!(record.username, "alice");
    assert_eq!(record.email, "a@x.com");

    // Nothing in the session path carries the password hash.
    let json = serde_json::to_string(&record).unwrap();
    assert!(!json.contains("password"));
    assert!(!payload.as_str().contains("argon2"));
}

#[test]
fn test_unknown_username_is_user_not_found() {
    let service = service();
    service
        .register(&register("alice", "a@x.com", "Str0ng!Pass"))
        .unwrap();

    let result = service.login(&login("mallory", "Str0ng!Pass"));
    assert_eq!(result, Err(AuthError::UserNotFound));
}

/// The two login failures are distinct results internally, but the
/// message rendered to the browser is identical for both.
#[test]
fn test_login_failures_render_identically() {
    let service = service();
    service
        .register(&register("alice", "a@x.com", "Str0ng!Pass"))
        .unwrap();

    let unknown = service.login(&login("mallory", "pw")).unwrap_err();
    let mismatch = service.login(&login("alice", "pw")).unwrap_err();

    assert_ne!(unknown, mismatch);
    assert_eq!(unknown.public_message(), mismatch.public_message());
    assert_eq!(unknown.status_code(), mismatch.status_code());
}

#[test]
fn test_submit_dispatches_the_closed_strategy_set() {
    let service = service();

    let registered = service
        .submit(&CredentialSubmission::Register(register(
            "bob", "b@x.com", "pw",
        )))
        .unwrap();
    let logged_in = service
        .submit(&CredentialSubmission::Login(login("bob", "pw")))
        .unwrap();

    assert_eq!(registered, logged_in);
}

// =============================================================================
// Store Failure Propagation
// =============================================================================

/// Store that refuses every call, as an unreachable backend would.
struct DownStore;

impl gatehouse::CredentialStore for DownStore {
    fn find_by_username(
        &self,
        _: &str,
    ) -> Result<Option<gatehouse::Credential>, StoreError> {
        Err(StoreError::Io("connection refused".to_string()))
    }

    fn find_by_id(
        &self,
        _: gatehouse::UserId,
    ) -> Result<Option<gatehouse::UserRecord>, StoreError> {
        Err(StoreError::Io("connection refused".to_string()))
    }

    fn insert(
        &self,
        _: gatehouse::NewCredential,
    ) -> Result<gatehouse::InsertReceipt, StoreError> {
        Err(StoreError::Io("connection refused".to_string()))
    }

    fn last_insert_id(&self) -> Result<Option<gatehouse::UserId>, StoreError> {
        Err(StoreError::Io("connection refused".to_string()))
    }
}

/// An outage surfaces as a store error with a 500-class status; it never
/// masquerades as a bad password.
#[test]
fn test_store_outage_is_not_a_credential_failure() {
    let service = AuthService::new(
        DownStore,
        CredentialHasher::new(HasherConfig { work_factor: 2 }).unwrap(),
    );

    let err = service.login(&login("alice", "pw")).unwrap_err();
    assert!(matches!(err, AuthError::Store(_)));
    assert_ne!(err, AuthError::InvalidCredentials);
    assert_eq!(err.status_code(), 500);
}

// =============================================================================
// Gate Flow
// =============================================================================

/// Login stores a payload, the gate admits the request, logout flips it
/// back to a redirect.
#[test]
fn test_protected_route_flow() {
    let service = service();
    let mut storage = InMemorySessionStorage::new();

    // Anonymous browser is redirected.
    let state = AuthenticationGate::resolve(service.sessions(), &storage);
    assert_eq!(
        AuthenticationGate::require_authenticated(&state),
        GateDecision::RedirectToLogin
    );

    // Login, then the HTTP layer stores the payload.
    let token = service
        .register(&register("carol", "c@x.com", "pw"))
        .unwrap();
    storage.store(service.sessions().serialize(token));

    let state = AuthenticationGate::resolve(service.sessions(), &storage);
    assert_eq!(
        AuthenticationGate::require_authenticated(&state),
        GateDecision::Proceed
    );
    assert_eq!(state.user().unwrap().username, "carol");

    // Logout invalidates; the same browser is anonymous again.
    AuthenticationGate::logout(&mut storage);
    let state = AuthenticationGate::resolve(service.sessions(), &storage);
    assert_eq!(
        AuthenticationGate::require_authenticated(&state),
        GateDecision::RedirectToLogin
    );
}
