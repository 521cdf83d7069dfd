#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

//! Store + owner provisioning is all-or-nothing.

mod common;

use common::{PASSWORD, provision, store_input, test_app};
use store_ratings::domain::error::DomainError;
use store_ratings::domain::repos::{StoresRepository, UsersRepository};
use store_ratings::infra::storage::{OrmStoresRepository, OrmUsersRepository};
use store_ratings_sdk::Role;

#[tokio::test]
async fn provisioning_links_owner_and_store() {
    let app = test_app().await;

    let provisioned = provision(&app.svc, "Shop@Example.com", "owner@example.com").await;

    assert_eq!(provisioned.store.email, "shop@example.com");
    assert_eq!(provisioned.store.owner_id, provisioned.owner.id);
    assert_eq!(provisioned.store.total_ratings, 0);
    assert_eq!(provisioned.store.average_rating, 0.0);
    assert_eq!(provisioned.owner.role, Role::StoreOwner);
    assert_eq!(provisioned.owner.store_id, Some(provisioned.store.id));

    let stored_owner = OrmUsersRepository::new()
        .get(&app.db, provisioned.owner.id)
        .await
        .unwrap()
        .expect("owner persisted");
    assert_eq!(stored_owner.store_id, Some(provisioned.store.id));

    // The owner can sign in with the provisioned password.
    let session = app.svc.login("owner@example.com", PASSWORD).await.unwrap();
    assert_eq!(session.user.id, provisioned.owner.id);
}

#[tokio::test]
async fn duplicate_store_email_is_reported_on_email() {
    let app = test_app().await;
    provision(&app.svc, "shop@example.com", "owner@example.com").await;

    let (store, owner) = store_input("shop@example.com", "other-owner@example.com");
    let err = app.svc.provision_store(store, owner).await.unwrap_err();

    assert!(matches!(err, DomainError::EmailAlreadyExists { ref field, .. } if field == "email"));
    assert!(
        !OrmUsersRepository::new()
            .email_exists(&app.db, "other-owner@example.com")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn duplicate_owner_email_is_reported_on_owner_email() {
    let app = test_app().await;
    provision(&app.svc, "shop@example.com", "owner@example.com").await;

    let (store, owner) = store_input("second-shop@example.com", "owner@example.com");
    let err = app.svc.provision_store(store, owner).await.unwrap_err();

    assert!(
        matches!(err, DomainError::EmailAlreadyExists { ref field, .. } if field == "ownerEmail")
    );
    assert!(
        !OrmStoresRepository::new()
            .email_exists(&app.db, "second-shop@example.com")
            .await
            .unwrap()
    );
    assert_eq!(OrmStoresRepository::new().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn invalid_owner_fields_name_the_owner_field() {
    let app = test_app().await;

    let (store, mut owner) = store_input("shop@example.com", "owner@example.com");
    owner.password = "short".to_owned();
    let err = app.svc.provision_store(store, owner).await.unwrap_err();
    assert!(
        matches!(err, DomainError::Validation { ref field, .. } if field == "ownerPassword")
    );

    let (mut store, owner) = store_input("shop@example.com", "owner@example.com");
    store.name = "ab".to_owned();
    let err = app.svc.provision_store(store, owner).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "name"));

    assert_eq!(OrmStoresRepository::new().count(&app.db).await.unwrap(), 0);
}
