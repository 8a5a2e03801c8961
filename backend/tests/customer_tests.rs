//! Customer management tests

mod common;

use common::*;
use uuid::Uuid;

use glass_rental_backend::error::AppError;
use shared::models::CustomerPatch;
use shared::types::SearchQuery;

#[tokio::test]
async fn test_create_and_get_customer() {
    let app = test_app();
    let created = app
        .customers
        .create(new_customer("  Alice Uwase ", "alice@example.com"))
        .await
        .unwrap();
    assert_eq!(created.name, "Alice Uwase");

    let fetched = app.customers.get(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = test_app();
    seed_customer(&app, "Alice Uwase", "alice@example.com").await;

    let err = app
        .customers
        .create(new_customer("Alice Again", "alice@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateKey(ref field) if field == "email"));

    let bob = seed_customer(&app, "Bob Mugisha", "bob@example.com").await;
    let err = app
        .customers
        .update(
            bob.id,
            CustomerPatch {
                email: Some("alice@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateKey(_)));
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let app = test_app();
    let alice = seed_customer(&app, "Alice Uwase", "alice@example.com").await;

    let updated = app
        .customers
        .update(
            alice.id,
            CustomerPatch {
                event_location: Some("Kigali Convention Centre".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.event_location, "Kigali Convention Centre");
    assert_eq!(updated.name, alice.name);
    assert_eq!(updated.email, alice.email);
    assert_eq!(updated.event_date, alice.event_date);

    let unchanged = app
        .customers
        .update(alice.id, CustomerPatch::default())
        .await
        .unwrap();
    assert_eq!(unchanged, updated);
}

#[tokio::test]
async fn test_search_matches_name_and_email() {
    let app = test_app();
    seed_customer(&app, "Alice Uwase", "alice@example.com").await;
    seed_customer(&app, "Bob Mugisha", "bob@events.rw").await;

    let everyone = app.customers.list(&SearchQuery::default()).await.unwrap();
    assert_eq!(everyone.len(), 2);
    // newest first
    assert_eq!(everyone[0].name, "Bob Mugisha");

    let by_name = app
        .customers
        .list(&SearchQuery {
            search: Some("UWASE".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);

    let by_email = app
        .customers
        .list(&SearchQuery {
            search: Some("events.rw".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].name, "Bob Mugisha");
}

#[tokio::test]
async fn test_missing_customer_is_not_found() {
    let app = test_app();
    let id = Uuid::new_v4();

    assert!(matches!(app.customers.get(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(app.customers.delete(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        app.customers
            .update(
                id,
                CustomerPatch {
                    name: Some("Nobody".to_string()),
                    ..Default::default()
                }
            )
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_invalid_customer_input() {
    let app = test_app();

    let err = app
        .customers
        .create(new_customer("Alice Uwase", "not-an-email"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "email"));

    let err = app
        .customers
        .create(new_customer("   ", "alice@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "name"));

    assert!(app.customers.list(&SearchQuery::default()).await.unwrap().is_empty());
}
