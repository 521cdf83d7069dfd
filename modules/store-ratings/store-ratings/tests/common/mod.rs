#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Shared fixtures: an in-memory SQLite database with migrations applied and
//! a fully wired module with cheap hashing parameters.

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use secrecy::SecretString;
use store_ratings::StoreRatingsModule;
use store_ratings::api::rest::routes::ConcreteService;
use store_ratings::config::{AuthConfig, PasswordHashConfig, StoreRatingsConfig};
use store_ratings_sdk::{
    AuthSession, NewStore, NewStoreOwner, NewUser, ProvisionedStore, RatingSubmission, Role, User,
};
use uuid::Uuid;

pub const TEST_SECRET: &str = "store-ratings-test-secret";
pub const PASSWORD: &str = "Passw0rd!";

pub struct TestApp {
    pub db: DatabaseConnection,
    pub module: StoreRatingsModule,
    pub svc: Arc<ConcreteService>,
}

/// One pooled connection: every `sqlite::memory:` connection is its own database.
pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite");
    StoreRatingsModule::migrate(&db).await.expect("migrate");
    db
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: SecretString::from(TEST_SECRET.to_owned()),
        token_ttl_secs: 3600,
    }
}

pub fn test_config() -> StoreRatingsConfig {
    StoreRatingsConfig {
        password_hash: PasswordHashConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        },
        ..StoreRatingsConfig::default()
    }
}

pub async fn test_app() -> TestApp {
    let db = test_db().await;
    let module = StoreRatingsModule::init(db.clone(), &test_config(), &test_auth_config())
        .expect("init module");
    let svc = module.service();
    TestApp { db, module, svc }
}

/// A name that satisfies the 20..=60 character rule.
pub fn person_name(tag: &str) -> String {
    format!("{tag} Test Person Fullname")
}

pub fn new_user(email: &str, role: Role) -> NewUser {
    NewUser {
        name: person_name("Regular"),
        email: email.to_owned(),
        password: PASSWORD.to_owned(),
        address: "1 Main Street".to_owned(),
        role,
        store_id: None,
    }
}

pub async fn seed_admin(svc: &ConcreteService, email: &str) -> User {
    svc.create_user(new_user(email, Role::Admin))
        .await
        .expect("seed admin")
}

pub async fn register(svc: &ConcreteService, email: &str) -> AuthSession {
    svc.register(new_user(email, Role::User))
        .await
        .expect("register user")
}

pub fn store_input(store_email: &str, owner_email: &str) -> (NewStore, NewStoreOwner) {
    (
        NewStore {
            name: "Corner Bakery".to_owned(),
            email: store_email.to_owned(),
            address: "12 Baker Street".to_owned(),
        },
        NewStoreOwner {
            name: person_name("Owner"),
            email: owner_email.to_owned(),
            password: PASSWORD.to_owned(),
            address: "14 Baker Street".to_owned(),
        },
    )
}

pub async fn provision(
    svc: &ConcreteService,
    store_email: &str,
    owner_email: &str,
) -> ProvisionedStore {
    let (store, owner) = store_input(store_email, owner_email);
    svc.provision_store(store, owner)
        .await
        .expect("provision store")
}

pub fn submission(store_id: Uuid, rating: f64) -> RatingSubmission {
    RatingSubmission {
        store_id: Some(store_id),
        rating: Some(rating),
        comment: None,
    }
}
