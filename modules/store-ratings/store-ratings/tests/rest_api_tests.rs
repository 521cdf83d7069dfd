#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

//! End-to-end HTTP tests over the axum router.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use common::{PASSWORD, person_name, seed_admin, test_app};
use serde_json::{Value, json};
use tower::ServiceExt;

struct Client {
    router: Router,
}

impl Client {
    async fn new() -> (Self, common::TestApp) {
        let app = test_app().await;
        let router = app.module.register_rest(Router::new());
        (Self { router }, app)
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "name": person_name("Rest"),
                    "email": email,
                    "password": PASSWORD,
                    "address": "1 Main Street",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_owned()
    }

    async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_owned()
    }

    async fn create_store(&self, admin: &str, store_email: &str, owner_email: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/stores",
                Some(admin),
                Some(json!({
                    "name": "Corner Bakery",
                    "email": store_email,
                    "address": "12 Baker Street",
                    "ownerName": person_name("Owner"),
                    "ownerEmail": owner_email,
                    "ownerPassword": PASSWORD,
                    "ownerAddress": "14 Baker Street",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

async fn admin_token(client: &Client, app: &common::TestApp) -> String {
    seed_admin(&app.svc, "admin@example.com").await;
    client.login("admin@example.com").await
}

#[tokio::test]
async fn health_is_public() {
    let (client, _app) = Client::new().await;
    let (status, body) = client.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_login_and_me() {
    let (client, _app) = Client::new().await;
    let token = client.register("jane@example.com").await;

    let (status, body) = client
        .send(Method::GET, "/api/auth/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "jane@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = client
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "jane@example.com", "password": "Wrong!Pass1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn duplicate_registration_is_409_with_field() {
    let (client, _app) = Client::new().await;
    client.register("jane@example.com").await;

    let (status, body) = client
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "name": person_name("Rest"),
                "email": "jane@example.com",
                "password": PASSWORD,
                "address": "1 Main Street",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["errors"][0]["field"], "email");
}

#[tokio::test]
async fn unauthenticated_requests_get_identical_401s() {
    let (client, _app) = Client::new().await;

    let (missing_status, missing) = client.send(Method::GET, "/api/users", None, None).await;
    let (garbage_status, garbage) = client
        .send(Method::GET, "/api/users", Some("garbage"), None)
        .await;

    assert_eq!(missing_status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage_status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing["detail"], garbage["detail"]);
    assert_eq!(missing["code"], garbage["code"]);
    assert_eq!(missing["title"], garbage["title"]);
}

#[tokio::test]
async fn end_user_calling_admin_operation_is_403_without_side_effects() {
    let (client, app) = Client::new().await;
    let token = client.register("jane@example.com").await;

    let (status, _) = client
        .send(
            Method::POST,
            "/api/stores",
            Some(&token),
            Some(json!({
                "name": "Sneaky Store",
                "email": "sneaky@example.com",
                "address": "Nowhere",
                "ownerName": person_name("Sneaky"),
                "ownerEmail": "sneaky-owner@example.com",
                "ownerPassword": PASSWORD,
                "ownerAddress": "Nowhere",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let stats = app.svc.dashboard().await.unwrap();
    assert_eq!(stats.total_stores, 0);

    let (status, _) = client
        .send(Method::GET, "/api/users/dashboard", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn rating_flow_over_http() {
    let (client, app) = Client::new().await;
    let admin = admin_token(&client, &app).await;
    let created = client
        .create_store(&admin, "shop@example.com", "owner@example.com")
        .await;
    assert_eq!(created["message"], "Store and owner created successfully");
    assert_eq!(created["owner"]["email"], "owner@example.com");
    let store_id = created["store"]["id"].as_str().unwrap().to_owned();

    let user = client.register("jane@example.com").await;

    let (status, body) = client
        .send(
            Method::POST,
            "/api/ratings",
            Some(&user),
            Some(json!({ "storeId": store_id, "rating": 4, "comment": "Nice" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["message"], "Rating submitted successfully");
    assert_eq!(body["rating"]["rating"], 4);

    let (status, body) = client
        .send(
            Method::POST,
            "/api/ratings",
            Some(&user),
            Some(json!({ "storeId": store_id, "rating": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Rating updated successfully");

    let (status, body) = client
        .send(
            Method::POST,
            "/api/ratings",
            Some(&user),
            Some(json!({ "storeId": store_id, "rating": 4.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "rating");

    let (status, body) = client
        .send(Method::GET, "/api/stores", Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["averageRating"], 5.0);
    assert_eq!(body[0]["totalRatings"], 1);
    assert_eq!(body[0]["userRating"], 5);

    // Admins see no userRating field at all.
    let (_, body) = client
        .send(Method::GET, "/api/stores", Some(&admin), None)
        .await;
    assert!(body[0].get("userRating").is_none());

    let owner = client.login("owner@example.com").await;
    let (status, body) = client
        .send(Method::GET, "/api/ratings/store", Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalRatings"], 1);
    assert_eq!(body["ratings"][0]["user"]["email"], "jane@example.com");

    // Owners cannot rate.
    let (status, _) = client
        .send(
            Method::POST,
            "/api/ratings",
            Some(&owner),
            Some(json!({ "storeId": store_id, "rating": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = client
        .send(
            Method::DELETE,
            &format!("/api/ratings/{store_id}"),
            Some(&user),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = client
        .send(Method::GET, "/api/stores", Some(&user), None)
        .await;
    assert_eq!(body[0]["totalRatings"], 0);
    assert_eq!(body[0]["averageRating"], 0.0);
    assert_eq!(body[0]["userRating"], Value::Null);
}

#[tokio::test]
async fn admin_listings_filter_and_sort() {
    let (client, app) = Client::new().await;
    let admin = admin_token(&client, &app).await;
    client
        .create_store(&admin, "alpha@example.com", "owner-a@example.com")
        .await;
    client.register("jane@example.com").await;

    let (status, body) = client
        .send(
            Method::GET,
            "/api/users?role=storeOwner&sortBy=email&sortOrder=desc",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["email"], "owner-a@example.com");
    assert_eq!(body[0]["store"]["name"], "Corner Bakery");

    let (status, body) = client
        .send(Method::GET, "/api/users?sortBy=password", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "sortBy");

    let (status, body) = client
        .send(
            Method::GET,
            "/api/stores/admin?email=ALPHA",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["owner"]["email"], "owner-a@example.com");

    let (status, body) = client
        .send(Method::GET, "/api/users/dashboard", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalUsers"], 2);
    assert_eq!(body["totalStores"], 1);
}

#[tokio::test]
async fn unknown_user_id_is_404_and_bad_id_is_400() {
    let (client, app) = Client::new().await;
    let admin = admin_token(&client, &app).await;

    let (status, body) = client
        .send(
            Method::GET,
            &format!("/api/users/{}", uuid::Uuid::now_v7()),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let (status, _) = client
        .send(Method::GET, "/api/users/not-a-uuid", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn change_password_over_http() {
    let (client, _app) = Client::new().await;
    let token = client.register("jane@example.com").await;

    let (status, body) = client
        .send(
            Method::PUT,
            "/api/auth/change-password",
            Some(&token),
            Some(json!({ "currentPassword": PASSWORD, "newPassword": "N3w!Password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated successfully");
}

#[tokio::test]
async fn problems_carry_the_request_id() {
    let (client, _app) = Client::new().await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/users")
        .header("x-request-id", "req-7f3a")
        .body(Body::empty())
        .unwrap();

    let response = client.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["trace_id"], "req-7f3a");

    let (_, anonymous) = client.send(Method::GET, "/api/users", None, None).await;
    assert!(anonymous["trace_id"].is_null());
}
