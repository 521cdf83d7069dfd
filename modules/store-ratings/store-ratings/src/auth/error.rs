use store_ratings_sdk::Role;
use thiserror::Error;

/// Rejections produced by the authorization gate.
///
/// Every failure to establish identity collapses into [`AuthError::Unauthenticated`]
/// so callers cannot tell a missing, forged, expired or orphaned token apart.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required: missing or invalid token")]
    Unauthenticated,

    #[error("Forbidden: requires role {required}")]
    Forbidden { required: Role },

    #[error("Internal error: {0}")]
    Internal(String),
}
