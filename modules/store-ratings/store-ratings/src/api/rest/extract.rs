//! Extractors whose rejections are rendered as Problem Details.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::api::rest::error::auth_error_to_problem;
use crate::api::rest::middleware::current_request_id;
use crate::api::rest::problem::Problem;
use crate::auth::{AuthError, Principal};
use crate::errors::ErrorCode;

/// JSON body; a malformed body is a 400 validation problem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let instance = req.uri().path().to_owned();
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ErrorCode::Validation.with_context(
                rejection.body_text(),
                &instance,
                current_request_id(),
            )),
        }
    }
}

/// Query string; a malformed query is a 400 validation problem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ErrorCode::Validation.with_context(
                rejection.body_text(),
                parts.uri.path(),
                current_request_id(),
            )),
        }
    }
}

/// Path parameters; an unparsable segment is a 400 validation problem.
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(ErrorCode::Validation.with_context(
                rejection.body_text(),
                parts.uri.path(),
                current_request_id(),
            )),
        }
    }
}

/// The principal attached by the authentication middleware.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub Principal);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(Authenticated)
            .ok_or_else(|| {
                tracing::error!("Principal not found - authentication middleware not configured");
                auth_error_to_problem(&AuthError::Unauthenticated, parts.uri.path())
            })
    }
}
