use std::sync::Arc;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{MethodRouter, delete, get, post, put};
use axum::{Extension, Json, Router};
use serde_json::{Value, json};
use store_ratings_sdk::Role;

use crate::api::rest::handlers::{auth, ratings, stores, users};
use crate::api::rest::middleware::{authenticate, require_role, scope_request_id};
use crate::auth::PrincipalResolver;
use crate::domain::service::Service;
use crate::infra::storage::{OrmRatingsRepository, OrmStoresRepository, OrmUsersRepository};

/// Type alias for the concrete service type.
pub type ConcreteService =
    Service<OrmUsersRepository, OrmStoresRepository, OrmRatingsRepository>;

/// Mount the module's endpoints on `router`.
///
/// Everything except registration, login and `/health` sits behind
/// [`authenticate`]; role-gated endpoints additionally pass [`require_role`].
pub fn register_routes(
    router: Router,
    service: Arc<ConcreteService>,
    resolver: Arc<dyn PrincipalResolver>,
) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    let protected = Router::new()
        // Any authenticated principal
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/change-password", put(auth::change_password))
        // Admin
        .route("/api/users/dashboard", only(Role::Admin, get(users::dashboard)))
        .route(
            "/api/users",
            only(Role::Admin, get(users::list_users).post(users::create_user)),
        )
        .route("/api/users/{id}", only(Role::Admin, get(users::get_user)))
        .route(
            "/api/stores/admin",
            only(Role::Admin, get(stores::list_stores_admin)),
        )
        .route(
            "/api/stores",
            get(stores::list_stores).merge(only(Role::Admin, post(stores::create_store))),
        )
        // End users
        .route("/api/ratings", only(Role::User, post(ratings::submit_rating)))
        .route(
            "/api/ratings/{store_id}",
            only(Role::User, delete(ratings::delete_rating)),
        )
        // Store owners; the static segment wins over `{store_id}`
        .route(
            "/api/ratings/store",
            only(Role::StoreOwner, get(ratings::owner_store_ratings)),
        )
        .route_layer(from_fn_with_state(resolver, authenticate));

    router
        .merge(public)
        .merge(protected)
        .layer(Extension(service))
        .layer(from_fn(scope_request_id))
}

fn only(role: Role, route: MethodRouter) -> MethodRouter {
    route.route_layer(from_fn_with_state(role, require_role))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
