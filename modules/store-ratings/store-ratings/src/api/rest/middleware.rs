//! Axum middleware for the authorization gate.
//!
//! `authenticate` wraps every protected route and attaches the [`Principal`];
//! `require_role` is layered inside it, so a role is only ever checked on a
//! resolved principal. `scope_request_id` wraps the whole module router so
//! problems rendered anywhere below it carry the caller's request id.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use store_ratings_sdk::Role;

use crate::api::rest::error::auth_error_to_problem;
use crate::auth::{AuthError, Principal, PrincipalResolver, authorization_header};

/// Header set by the server's request-id layer.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    static REQUEST_ID: String;
}

/// The `x-request-id` of the request being served, if the caller or the
/// server stack supplied one.
#[must_use]
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}

pub async fn scope_request_id(request: Request, next: Next) -> Response {
    let Some(id) = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
    else {
        return next.run(request).await;
    };
    REQUEST_ID.scope(id, next.run(request)).await
}

pub async fn authenticate(
    State(resolver): State<Arc<dyn PrincipalResolver>>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_preflight_request(request.method(), request.headers()) {
        return next.run(request).await;
    }

    match resolver
        .resolve(authorization_header(request.headers()))
        .await
    {
        Ok(principal) => {
            tracing::debug!(user_id = %principal.id, role = %principal.role, "Request authenticated");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!("Request rejected by authorization gate: {err}");
            auth_error_to_problem(&err, request.uri().path()).into_response()
        }
    }
}

pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Response {
    let Some(principal) = request.extensions().get::<Principal>().copied() else {
        return auth_error_to_problem(&AuthError::Unauthenticated, request.uri().path())
            .into_response();
    };

    if let Err(err) = principal.require_role(required) {
        tracing::warn!(
            user_id = %principal.id,
            role = %principal.role,
            required = %required,
            path = request.uri().path(),
            "Role check failed"
        );
        return auth_error_to_problem(&err, request.uri().path()).into_response();
    }

    next.run(request).await
}

/// CORS preflight: OPTIONS with `Origin` and `Access-Control-Request-Method`.
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(axum::http::header::ORIGIN)
        && headers.contains_key(axum::http::header::ACCESS_CONTROL_REQUEST_METHOD)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::middleware::{from_fn, from_fn_with_state};
    use axum::routing::get;
    use tower::ServiceExt;
    use tracing_test::traced_test;
    use uuid::Uuid;

    fn router_for(role: Role) -> Router {
        Router::new()
            .route("/admin-only", get(|| async { "ok" }))
            .route_layer(from_fn_with_state(Role::Admin, require_role))
            .layer(from_fn(move |mut req: Request, next: Next| async move {
                req.extensions_mut().insert(Principal {
                    id: Uuid::nil(),
                    role,
                    store_id: None,
                });
                next.run(req).await
            }))
    }

    async fn call(router: Router) -> StatusCode {
        let req = Request::builder()
            .uri("/admin-only")
            .body(Body::empty())
            .unwrap();
        router.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    #[traced_test]
    async fn wrong_role_is_forbidden_and_logged() {
        assert_eq!(call(router_for(Role::User)).await, StatusCode::FORBIDDEN);
        assert!(logs_contain("Role check failed"));
    }

    #[tokio::test]
    async fn matching_role_passes() {
        assert_eq!(call(router_for(Role::Admin)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_principal_is_unauthenticated() {
        let router = Router::new()
            .route("/admin-only", get(|| async { "ok" }))
            .route_layer(from_fn_with_state(Role::Admin, require_role));
        assert_eq!(call(router).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn request_id_is_visible_while_serving() {
        let router = Router::new()
            .route(
                "/whoami",
                get(|| async { current_request_id().unwrap_or_default() }),
            )
            .layer(from_fn(scope_request_id));

        let req = Request::builder()
            .uri("/whoami")
            .header(REQUEST_ID_HEADER, "req-42")
            .body(Body::empty())
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"req-42");

        let req = Request::builder().uri("/whoami").body(Body::empty()).unwrap();
        let resp = router.oneshot(req).await.unwrap();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
        assert_eq!(current_request_id(), None);
    }

    #[test]
    fn preflight_needs_origin_and_method_headers() {
        let mut headers = HeaderMap::new();
        assert!(!is_preflight_request(&Method::OPTIONS, &headers));
        headers.insert(axum::http::header::ORIGIN, "http://localhost:5173".parse().unwrap());
        headers.insert(
            axum::http::header::ACCESS_CONTROL_REQUEST_METHOD,
            "POST".parse().unwrap(),
        );
        assert!(is_preflight_request(&Method::OPTIONS, &headers));
        assert!(!is_preflight_request(&Method::GET, &headers));
    }
}
