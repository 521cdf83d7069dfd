#![allow(clippy::unwrap_used, clippy::expect_used)]

//! The gate resolves a principal from a bearer token, or rejects uniformly.

mod common;

use common::{TEST_SECRET, provision, register, seed_admin, test_app};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::EntityTrait;
use store_ratings::auth::{AuthError, Claims};
use store_ratings::infra::storage::entity::user;
use store_ratings_sdk::Role;
use time::OffsetDateTime;
use uuid::Uuid;

fn signed(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn valid_token_resolves_principal_with_role_and_store() {
    let app = test_app().await;
    let resolver = app.module.resolver();

    let session = register(&app.svc, "jane@example.com").await;
    let principal = resolver
        .resolve(Some(&format!("Bearer {}", session.token)))
        .await
        .unwrap();
    assert_eq!(principal.id, session.user.id);
    assert_eq!(principal.role, Role::User);
    assert_eq!(principal.store_id, None);

    let provisioned = provision(&app.svc, "shop@example.com", "owner@example.com").await;
    let owner_session = app
        .svc
        .login("owner@example.com", common::PASSWORD)
        .await
        .unwrap();
    let owner = resolver
        .resolve(Some(&format!("Bearer {}", owner_session.token)))
        .await
        .unwrap();
    assert_eq!(owner.role, Role::StoreOwner);
    assert_eq!(owner.store_id, Some(provisioned.store.id));
}

#[tokio::test]
async fn every_identity_failure_is_unauthenticated() {
    let app = test_app().await;
    let resolver = app.module.resolver();
    let session = register(&app.svc, "jane@example.com").await;
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let expired = signed(
        &Claims {
            sub: session.user.id,
            iat: now - 7200,
            exp: now - 3600,
        },
        TEST_SECRET,
    );
    let forged = signed(
        &Claims {
            sub: session.user.id,
            iat: now,
            exp: now + 3600,
        },
        "some-other-secret",
    );
    let unknown_subject = signed(
        &Claims {
            sub: Uuid::now_v7(),
            iat: now,
            exp: now + 3600,
        },
        TEST_SECRET,
    );

    let cases = [
        None,
        Some(String::new()),
        Some(session.token.clone()),
        Some("Basic dXNlcjpwYXNz".to_owned()),
        Some("Bearer not-a-jwt".to_owned()),
        Some(format!("Bearer {expired}")),
        Some(format!("Bearer {forged}")),
        Some(format!("Bearer {unknown_subject}")),
    ];
    for header in cases {
        let result = resolver.resolve(header.as_deref()).await;
        assert!(
            matches!(result, Err(AuthError::Unauthenticated)),
            "{header:?} should be unauthenticated"
        );
    }
}

#[tokio::test]
async fn token_of_a_deleted_user_is_unauthenticated() {
    let app = test_app().await;
    let resolver = app.module.resolver();
    let session = register(&app.svc, "jane@example.com").await;
    let header = format!("Bearer {}", session.token);

    assert!(resolver.resolve(Some(&header)).await.is_ok());

    user::Entity::delete_by_id(session.user.id)
        .exec(&app.db)
        .await
        .unwrap();

    assert!(matches!(
        resolver.resolve(Some(&header)).await,
        Err(AuthError::Unauthenticated)
    ));
}

#[tokio::test]
async fn role_check_runs_on_the_resolved_principal() {
    let app = test_app().await;
    let resolver = app.module.resolver();
    seed_admin(&app.svc, "admin@example.com").await;
    let admin_session = app
        .svc
        .login("admin@example.com", common::PASSWORD)
        .await
        .unwrap();
    let user_session = register(&app.svc, "jane@example.com").await;

    let admin = resolver
        .resolve(Some(&format!("Bearer {}", admin_session.token)))
        .await
        .unwrap();
    let user = resolver
        .resolve(Some(&format!("Bearer {}", user_session.token)))
        .await
        .unwrap();

    assert!(admin.require_role(Role::Admin).is_ok());
    assert!(matches!(
        user.require_role(Role::Admin),
        Err(AuthError::Forbidden {
            required: Role::Admin
        })
    ));
}
