use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use store_ratings_sdk::{Store, StoreAdminQuery, StoreSearchQuery};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::aggregation::Aggregate;
use crate::domain::error::DomainError;

/// Repository trait for store persistence operations.
#[async_trait]
pub trait StoresRepository: Send + Sync {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Store>, DomainError>;

    async fn email_exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<bool, DomainError>;

    /// Insert a store. A unique violation on email maps to
    /// [`DomainError::EmailAlreadyExists`] with field `email`.
    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        store: Store,
    ) -> Result<Store, DomainError>;

    /// Overwrite the cached aggregate fields. Returns `false` if the store is gone.
    async fn update_aggregate<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        aggregate: Aggregate,
        at: OffsetDateTime,
    ) -> Result<bool, DomainError>;

    async fn search<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        query: &StoreSearchQuery,
    ) -> Result<Vec<Store>, DomainError>;

    async fn list_admin<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        query: &StoreAdminQuery,
    ) -> Result<Vec<Store>, DomainError>;

    async fn get_many<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[Uuid],
    ) -> Result<Vec<Store>, DomainError>;

    async fn count<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<u64, DomainError>;
}
