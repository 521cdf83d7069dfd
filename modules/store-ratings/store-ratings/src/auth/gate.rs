//! The authorization gate: bearer token -> verified claims -> live user -> principal.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use sea_orm::DatabaseConnection;

use super::error::AuthError;
use super::principal::Principal;
use super::token::JwtCodec;
use crate::domain::repos::UsersRepository;

/// Resolves the principal of a request from its `Authorization` header value.
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    async fn resolve(&self, authorization: Option<&str>) -> Result<Principal, AuthError>;
}

pub struct AuthGate<UR: UsersRepository> {
    db: DatabaseConnection,
    users: Arc<UR>,
    tokens: Arc<JwtCodec>,
}

impl<UR: UsersRepository> AuthGate<UR> {
    pub fn new(db: DatabaseConnection, users: Arc<UR>, tokens: Arc<JwtCodec>) -> Self {
        Self { db, users, tokens }
    }
}

#[async_trait]
impl<UR: UsersRepository + 'static> PrincipalResolver for AuthGate<UR> {
    async fn resolve(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        let token = authorization
            .and_then(parse_bearer)
            .ok_or(AuthError::Unauthenticated)?;

        let claims = self.tokens.verify(token)?;

        // A valid token may outlive its account.
        let user = self
            .users
            .get(&self.db, claims.sub)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or_else(|| {
                tracing::debug!(user_id = %claims.sub, "Token subject no longer exists");
                AuthError::Unauthenticated
            })?;

        Ok(Principal::from(&user))
    }
}

/// Raw `Authorization` header value, if it is valid visible ASCII.
#[must_use]
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

fn parse_bearer(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
