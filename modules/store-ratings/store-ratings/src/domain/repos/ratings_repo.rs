use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use store_ratings_sdk::{Rating, RatingValue};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Repository trait for rating persistence operations.
///
/// A rating is identified by its `(user_id, store_id)` pair; the storage
/// layer enforces that pair as unique.
#[async_trait]
pub trait RatingsRepository: Send + Sync {
    async fn find_by_user_and_store<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        store_id: Uuid,
    ) -> Result<Option<Rating>, DomainError>;

    /// Insert a new rating. A unique violation on `(user_id, store_id)` maps to
    /// [`DomainError::RatingAlreadyExists`].
    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        rating: Rating,
    ) -> Result<Rating, DomainError>;

    /// Overwrite value, comment and `updated_at` of an existing rating.
    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        rating: Rating,
    ) -> Result<Rating, DomainError>;

    async fn delete_by_user_and_store<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        store_id: Uuid,
    ) -> Result<bool, DomainError>;

    /// All rating values of a store, the input of the aggregation engine.
    async fn values_for_store<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        store_id: Uuid,
    ) -> Result<Vec<RatingValue>, DomainError>;

    /// Ratings of a store, newest first.
    async fn list_for_store<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        store_id: Uuid,
    ) -> Result<Vec<Rating>, DomainError>;

    /// The ratings one user gave to any of the given stores.
    async fn for_user_and_stores<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        store_ids: &[Uuid],
    ) -> Result<Vec<Rating>, DomainError>;

    async fn count<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<u64, DomainError>;
}
