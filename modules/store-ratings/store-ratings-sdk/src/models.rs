//! Public models for the `store-ratings` module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the `store-ratings` module and its consumers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Role of a principal. Fixed at account creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "storeOwner")]
    StoreOwner,
}

impl Role {
    /// Wire and storage representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::StoreOwner => "storeOwner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Role must be user, admin, or storeOwner (got '{0}')")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "storeOwner" => Ok(Self::StoreOwner),
            other => Err(RoleParseError(other.to_owned())),
        }
    }
}

/// A user account. The password hash never leaves the domain layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: Role,
    /// Set for store owners once their store exists.
    pub store_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Data for creating a new user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Plain-text password, hashed by the service before it is stored.
    pub password: String,
    pub address: String,
    pub role: Role,
    pub store_id: Option<Uuid>,
}

/// A rated store with its cached aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: Uuid,
    /// Mean of all ratings, rounded half up to one decimal. `0.0` when unrated.
    pub average_rating: f64,
    pub total_ratings: u32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Store fields of the provisioning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStore {
    pub name: String,
    pub email: String,
    pub address: String,
}

/// Owner fields of the provisioning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStoreOwner {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
}

/// Result of provisioning a store together with its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionedStore {
    pub store: Store,
    pub owner: User,
}

/// An integer star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RatingValue(u8);

impl RatingValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns `None` when `value` is outside `1..=5`.
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Accepts only finite whole numbers in `1..=5`.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .find(|candidate| (f64::from(*candidate) - value).abs() < f64::EPSILON)
            .map(Self)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// A single user's rating of a single store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub value: RatingValue,
    pub comment: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Raw submission as received from a client, validated by the service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatingSubmission {
    pub store_id: Option<Uuid>,
    /// `None` when the client sent no number at all.
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

/// Outcome of the submit-or-update operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedRating {
    pub rating: Rating,
    /// `true` when a new record was inserted, `false` when an existing one was overwritten.
    pub created: bool,
}

/// Token plus the authenticated user, returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSummary {
    pub id: Uuid,
    pub name: String,
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserWithStore {
    pub user: User,
    pub store: Option<StoreSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreWithOwner {
    pub store: Store,
    pub owner: Option<OwnerSummary>,
}

/// A store as seen by an end user, with that user's own rating if any.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreForUser {
    pub store: Store,
    pub user_rating: Option<RatingValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaterSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingWithRater {
    pub rating: Rating,
    pub rater: Option<RaterSummary>,
}

/// Store owner's view of the feedback for their store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRatingsReport {
    pub store_id: Uuid,
    pub ratings: Vec<RatingWithRater>,
    pub average_rating: f64,
    pub total_ratings: u32,
}

/// Admin dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    /// Non-admin accounts only.
    pub total_users: u64,
    pub total_stores: u64,
    pub total_ratings: u64,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::User, Role::StoreOwner] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("owner".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_as_camel_case_name() {
        let json = serde_json::to_string(&Role::StoreOwner).unwrap();
        assert_eq!(json, "\"storeOwner\"");
    }

    #[test]
    fn rating_value_accepts_only_whole_stars() {
        assert_eq!(RatingValue::from_f64(3.0).map(RatingValue::get), Some(3));
        assert_eq!(RatingValue::from_f64(1.0).map(RatingValue::get), Some(1));
        assert_eq!(RatingValue::from_f64(5.0).map(RatingValue::get), Some(5));
        assert!(RatingValue::from_f64(4.5).is_none());
        assert!(RatingValue::from_f64(0.0).is_none());
        assert!(RatingValue::from_f64(6.0).is_none());
        assert!(RatingValue::from_f64(f64::NAN).is_none());
        assert!(RatingValue::new(0).is_none());
        assert!(RatingValue::new(6).is_none());
    }
}
