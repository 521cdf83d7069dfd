//! HS256 bearer tokens: issuance on register/login, verification in the gate.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::AuthError;
use crate::config::AuthConfig;

/// Registered claims carried by the token. `sub` is the user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl JwtCodec {
    /// # Errors
    /// [`AuthError::Internal`] if the secret is empty or the TTL does not fit.
    pub fn new(cfg: &AuthConfig) -> Result<Self, AuthError> {
        let secret = cfg.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(AuthError::Internal("auth.jwt_secret must not be empty".to_owned()));
        }
        let ttl_secs = i64::try_from(cfg.token_ttl_secs)
            .map_err(|_| AuthError::Internal("auth.token_ttl_secs is too large".to_owned()))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        })
    }

    /// Sign a token for `user_id`, valid for the configured TTL.
    pub fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        let iat = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: user_id,
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }

    /// Check signature and expiry. Any failure is [`AuthError::Unauthenticated`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected bearer token: {e}");
                AuthError::Unauthenticated
            })
    }
}
