use axum::http::Uri;
use axum::response::{IntoResponse, Response};

use crate::api::rest::middleware::current_request_id;
use crate::api::rest::problem::{Problem, ValidationViolation};
use crate::auth::AuthError;
use crate::domain::error::DomainError;
use crate::errors::ErrorCode;

/// Map domain error to RFC 9457 Problem using the catalog.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let trace_id = current_request_id();

    match e {
        DomainError::Validation { field, message } => ErrorCode::Validation
            .with_context(message.clone(), instance, trace_id)
            .with_errors(vec![ValidationViolation {
                field: field.clone(),
                message: message.clone(),
            }]),
        DomainError::EmailAlreadyExists { field, email } => ErrorCode::EmailConflict
            .with_context(
                format!("Email '{email}' is already registered"),
                instance,
                trace_id,
            )
            .with_errors(vec![ValidationViolation {
                field: field.clone(),
                message: "Email is already registered".to_owned(),
            }]),
        DomainError::InvalidCredentials => {
            ErrorCode::InvalidCredentials.with_context("Invalid credentials", instance, trace_id)
        }
        DomainError::WrongCurrentPassword => ErrorCode::InvalidCredentials.with_context(
            "Current password is incorrect",
            instance,
            trace_id,
        ),
        DomainError::UserNotFound { id } => ErrorCode::UserNotFound.with_context(
            format!("User with id {id} was not found"),
            instance,
            trace_id,
        ),
        DomainError::StoreNotFound { id } => ErrorCode::StoreNotFound.with_context(
            format!("Store with id {id} was not found"),
            instance,
            trace_id,
        ),
        DomainError::RatingNotFound { store_id } => ErrorCode::RatingNotFound.with_context(
            format!("You have not rated store {store_id}"),
            instance,
            trace_id,
        ),
        DomainError::OwnerHasNoStore { .. } => ErrorCode::OwnerHasNoStore.with_context(
            "No store is linked to this account",
            instance,
            trace_id,
        ),
        DomainError::Database { .. } => {
            tracing::error!(error = ?e, "Database error occurred");
            ErrorCode::InternalDatabase.with_context(
                "An internal database error occurred",
                instance,
                trace_id,
            )
        }
        DomainError::RatingAlreadyExists | DomainError::Internal { .. } => {
            tracing::error!(error = ?e, "Internal error occurred");
            ErrorCode::Internal.with_context("An internal error occurred", instance, trace_id)
        }
    }
}

/// Map gate rejections. Every unauthenticated case renders the same body.
pub fn auth_error_to_problem(e: &AuthError, instance: &str) -> Problem {
    let trace_id = current_request_id();

    match e {
        AuthError::Unauthenticated => ErrorCode::Unauthenticated.with_context(
            "Authentication required: missing or invalid token",
            instance,
            trace_id,
        ),
        AuthError::Forbidden { required } => ErrorCode::Forbidden.with_context(
            format!("This operation requires the '{required}' role"),
            instance,
            trace_id,
        ),
        AuthError::Internal(msg) => {
            tracing::error!("Authorization gate failure: {msg}");
            ErrorCode::Internal.with_context("An internal error occurred", instance, trace_id)
        }
    }
}

pub type ApiResult<T> = Result<T, Problem>;

/// Attach the request path as the problem `instance` when mapping a domain error.
pub trait OrProblem<T> {
    fn or_problem(self, uri: &Uri) -> ApiResult<T>;
}

impl<T> OrProblem<T> for Result<T, DomainError> {
    fn or_problem(self, uri: &Uri) -> ApiResult<T> {
        self.map_err(|e| domain_error_to_problem(&e, uri.path()))
    }
}

/// Implement From<DomainError> for Problem so `?` works in handlers
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e, "/")
    }
}

impl From<AuthError> for Problem {
    fn from(e: AuthError) -> Self {
        auth_error_to_problem(&e, "/")
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        Problem::from(self).into_response()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use store_ratings_sdk::Role;
    use uuid::Uuid;

    #[test]
    fn validation_maps_to_400_with_field() {
        let p = domain_error_to_problem(&DomainError::validation("rating", "bad"), "/api/ratings");
        assert_eq!(p.status, StatusCode::BAD_REQUEST);
        assert_eq!(p.instance, "/api/ratings");
        let errors = p.errors.unwrap();
        assert_eq!(errors[0].field, "rating");
    }

    #[test]
    fn conflicts_keep_the_offending_field() {
        let p = domain_error_to_problem(
            &DomainError::email_already_exists("ownerEmail", "o@x.io"),
            "/",
        );
        assert_eq!(p.status, StatusCode::CONFLICT);
        assert_eq!(p.errors.unwrap()[0].field, "ownerEmail");
    }

    #[test]
    fn not_found_and_credentials() {
        assert_eq!(
            Problem::from(DomainError::store_not_found(Uuid::nil())).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Problem::from(DomainError::InvalidCredentials).status,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let p = Problem::from(DomainError::database("connection refused on 10.0.0.7"));
        assert_eq!(p.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!p.detail.contains("10.0.0.7"));
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(
            Problem::from(AuthError::Unauthenticated).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Problem::from(AuthError::Forbidden {
                required: Role::Admin
            })
            .status,
            StatusCode::FORBIDDEN
        );
    }
}
