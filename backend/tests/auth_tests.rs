//! Authentication tests
//!
//! Sign-up, sign-in, session resolution and sign-out against the in-memory
//! store, plus the session event stream.

mod common;

use std::sync::Arc;

use proptest::prelude::*;
use tokio::sync::broadcast;

use common::JWT_SECRET;
use glass_rental_backend::config::Config;
use glass_rental_backend::error::AppError;
use glass_rental_backend::services::auth::{SessionEvent, SignInInput, SignUpInput};
use glass_rental_backend::services::AuthService;
use glass_rental_backend::store::{MemoryStore, Store};

fn auth_service() -> AuthService {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let config = Config::in_memory(JWT_SECRET);
    let (events, _) = broadcast::channel(16);
    AuthService::new(store, &config.jwt, events)
}

fn sign_up_input(email: &str, password: &str) -> SignUpInput {
    SignUpInput {
        email: email.to_string(),
        password: password.to_string(),
        full_name: Some("Grace Ingabire".to_string()),
    }
}

fn sign_in_input(email: &str, password: &str) -> SignInInput {
    SignInInput {
        email: email.to_string(),
        password: password.to_string(),
    }
}

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate valid passwords (8+ chars)
fn password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#$%]{8,20}"
}

/// Generate passwords that are too short
fn short_password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{0,7}"
}

// ============================================================================
// Unit Tests
// ============================================================================

#[tokio::test]
async fn test_sign_up_opens_a_session() {
    let auth = auth_service();

    let session = auth
        .sign_up(sign_up_input("grace@example.com", "correct-horse"))
        .await
        .unwrap();
    assert_eq!(session.token_type, "Bearer");
    assert_eq!(session.user.email, "grace@example.com");
    assert_eq!(session.user.full_name.as_deref(), Some("Grace Ingabire"));

    let current = auth.get_session(&session.access_token).await.unwrap();
    assert_eq!(current.user_id, session.user.id);
    assert_eq!(current.email, "grace@example.com");
}

#[tokio::test]
async fn test_sign_in_checks_password() {
    let auth = auth_service();
    auth.sign_up(sign_up_input("grace@example.com", "correct-horse"))
        .await
        .unwrap();

    let session = auth
        .sign_in(sign_in_input("GRACE@example.com", "correct-horse"))
        .await
        .unwrap();
    assert!(!session.access_token.is_empty());

    let err = auth
        .sign_in(sign_in_input("grace@example.com", "wrong-horse"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));

    let err = auth
        .sign_in(sign_in_input("nobody@example.com", "correct-horse"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_duplicate_sign_up_is_rejected() {
    let auth = auth_service();
    auth.sign_up(sign_up_input("grace@example.com", "correct-horse"))
        .await
        .unwrap();

    let err = auth
        .sign_up(sign_up_input("Grace@Example.com", "another-pass"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateKey(_)));
}

#[tokio::test]
async fn test_sign_out_revokes_token() {
    let auth = auth_service();
    let session = auth
        .sign_up(sign_up_input("grace@example.com", "correct-horse"))
        .await
        .unwrap();
    let current = auth.get_session(&session.access_token).await.unwrap();

    auth.sign_out(&current).await.unwrap();
    let err = auth.get_session(&session.access_token).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    // signing out again is harmless
    auth.sign_out(&current).await.unwrap();
}

#[tokio::test]
async fn test_other_sessions_survive_sign_out() {
    let auth = auth_service();
    let first = auth
        .sign_up(sign_up_input("grace@example.com", "correct-horse"))
        .await
        .unwrap();
    let second = auth
        .sign_in(sign_in_input("grace@example.com", "correct-horse"))
        .await
        .unwrap();

    let current = auth.get_session(&first.access_token).await.unwrap();
    auth.sign_out(&current).await.unwrap();

    assert!(auth.get_session(&second.access_token).await.is_ok());
}

#[tokio::test]
async fn test_session_events_are_broadcast() {
    let auth = auth_service();
    let mut events = auth.subscribe();

    let session = auth
        .sign_up(sign_up_input("grace@example.com", "correct-horse"))
        .await
        .unwrap();
    let current = auth.get_session(&session.access_token).await.unwrap();
    auth.sign_out(&current).await.unwrap();

    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::SignedIn {
            user_id: current.user_id,
            session_id: current.session_id,
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::SignedOut {
            user_id: current.user_id,
            session_id: current.session_id,
        }
    );
}

#[tokio::test]
async fn test_foreign_or_garbage_tokens_are_rejected() {
    let auth = auth_service();
    let err = auth.get_session("not-a-token").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let session = auth
        .sign_up(sign_up_input("grace@example.com", "correct-horse"))
        .await
        .unwrap();

    // same secret, different store: the session is unknown there
    let elsewhere = auth_service();
    let err = elsewhere.get_session(&session.access_token).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let other_secret = Config::in_memory("a-completely-different-secret");
    let (events, _) = broadcast::channel(1);
    let other = AuthService::new(store, &other_secret.jwt, events);
    assert!(other.validate_token(&session.access_token).is_err());
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// Property: any password of at least 8 characters signs up and can sign in
    #[test]
    fn prop_valid_password_round_trips(password in password_strategy()) {
        let signed_in = tokio_test::block_on(async {
            let auth = auth_service();
            auth.sign_up(sign_up_input("grace@example.com", &password)).await.unwrap();
            auth.sign_in(sign_in_input("grace@example.com", &password)).await.is_ok()
        });
        prop_assert!(signed_in);
    }

    /// Property: passwords shorter than 8 characters are rejected
    #[test]
    fn prop_short_password_rejected(password in short_password_strategy()) {
        let result = tokio_test::block_on(async {
            auth_service().sign_up(sign_up_input("grace@example.com", &password)).await
        });
        let is_validation = matches!(result, Err(AppError::Validation { .. }));
        prop_assert!(is_validation);
    }
}
