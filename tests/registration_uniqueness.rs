//! Registration Uniqueness Tests
//!
//! Username and email are unique keys: sequential and concurrent
//! duplicate registrations admit exactly one winner, and the loser
//! observes a duplicate-credential result naming the colliding field.

use std::sync::Arc;
use std::thread;

use gatehouse::{
    AuthError, AuthService, CredentialHasher, DuplicateField, HasherConfig,
    InMemoryCredentialStore, RegisterRequest,
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

fn register(username: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: "Str0ng!Pass".to_string(),
    }
}

// =============================================================================
// Sequential Duplicates
// =============================================================================

#[test]
fn test_duplicate_username_rejected_with_field() {
    let service = service();

    service.register(&register("bob", "b@x.com")).unwrap();
    let err = service.register(&register("bob", "other@x.com")).unwrap_err();

    assert_eq!(err, AuthError::DuplicateCredential(DuplicateField::Username));
    assert_eq!(err.status_code(), 409);
}

#[test]
fn test_duplicate_email_rejected_with_field() {
    let service = service();

    service.register(&register("bob", "b@x.com")).unwrap();
    let err = service.register(&register("robert", "b@x.com")).unwrap_err();

    assert_eq!(err, AuthError::DuplicateCredential(DuplicateField::Email));
}

#[test]
fn test_distinct_registrations_get_distinct_ids() {
    let service = service();

    let first = service.register(&register("alice", "a@x.com")).unwrap();
    let second = service.register(&register("bob", "b@x.com")).unwrap();

    assert_ne!(first.user_id, second.user_id);
}

// =============================================================================
// Concurrent Duplicates
// =============================================================================

/// Two racing registrations of the same username: exactly one insert
/// succeeds, the other observes the uniqueness violation. The store
/// serializes the conflict; the strategies add nothing on top.
#[test]
fn test_concurrent_same_username_admits_one_winner() {
    let service = Arc::new(service());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                service.register(&register("bob", &format!("bob{}@x.com", i)))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);

    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result,
            Err(AuthError::DuplicateCredential(DuplicateField::Username))
        ));
    }

    // The surviving credential still authenticates.
    let login = gatehouse::LoginRequest {
        username: "bob".to_string(),
        password: "Str0ng!Pass".to_string(),
    };
    assert!(service.login(&login).is_ok());
}
