use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use store_ratings_sdk::{User, UserListQuery};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// A user together with the stored password hash. Never leaves the domain layer.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Repository trait for user persistence operations.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<User>, DomainError>;

    /// Look up by normalized email, returning the password hash as well.
    async fn find_credentials_by_email<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<UserCredentials>, DomainError>;

    async fn get_credentials<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<UserCredentials>, DomainError>;

    async fn email_exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<bool, DomainError>;

    /// Insert a user. A unique violation on email maps to
    /// [`DomainError::EmailAlreadyExists`] with field `email`.
    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user: User,
        password_hash: &str,
    ) -> Result<User, DomainError>;

    /// Point a user at a store. Returns `false` if the user does not exist.
    async fn set_store_link<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        store_id: Uuid,
    ) -> Result<bool, DomainError>;

    async fn set_password_hash<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<bool, DomainError>;

    /// Filtered and sorted listing. `RoleFilter::All` excludes admins.
    async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        query: &UserListQuery,
    ) -> Result<Vec<User>, DomainError>;

    async fn get_many<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[Uuid],
    ) -> Result<Vec<User>, DomainError>;

    /// Number of users with role `user` or `storeOwner`.
    async fn count_non_admin<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<u64, DomainError>;
}
