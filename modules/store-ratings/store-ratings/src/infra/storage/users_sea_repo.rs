use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use store_ratings_sdk::{User, UserListQuery, UserSortField};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::{UserCredentials, UsersRepository};
use crate::infra::storage::db::{contains_ci, db_err, filter_value, is_unique_violation, order};
use crate::infra::storage::entity::user::{
    ActiveModel as UserAM, Column, Entity as UserEntity, RoleColumn,
};

/// ORM-based implementation of the `UsersRepository` trait.
#[derive(Clone, Default)]
pub struct OrmUsersRepository;

impl OrmUsersRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UsersRepository for OrmUsersRepository {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<User>, DomainError> {
        let found = UserEntity::find_by_id(id).one(conn).await.map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_credentials_by_email<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let found = UserEntity::find()
            .filter(Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn get_credentials<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let found = UserEntity::find_by_id(id).one(conn).await.map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn email_exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<bool, DomainError> {
        let count = UserEntity::find()
            .filter(Column::Email.eq(email))
            .count(conn)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user: User,
        password_hash: &str,
    ) -> Result<User, DomainError> {
        let m = UserAM {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(password_hash.to_owned()),
            address: Set(user.address.clone()),
            role: Set(user.role.into()),
            store_id: Set(user.store_id),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };

        match m.insert(conn).await {
            Ok(_) => Ok(user),
            Err(e) if is_unique_violation(&e) => {
                Err(DomainError::email_already_exists("email", user.email))
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn set_store_link<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        store_id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = UserEntity::update_many()
            .col_expr(Column::StoreId, Expr::value(Some(store_id)))
            .col_expr(Column::UpdatedAt, Expr::value(OffsetDateTime::now_utc()))
            .filter(Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn set_password_hash<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<bool, DomainError> {
        let result = UserEntity::update_many()
            .col_expr(Column::PasswordHash, Expr::value(password_hash.to_owned()))
            .col_expr(Column::UpdatedAt, Expr::value(OffsetDateTime::now_utc()))
            .filter(Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        query: &UserListQuery,
    ) -> Result<Vec<User>, DomainError> {
        let mut cond = Condition::all();
        cond = match query.role.role() {
            Some(role) => cond.add(Column::Role.eq(RoleColumn::from(role))),
            None => cond.add(Column::Role.ne(RoleColumn::Admin)),
        };
        if let Some(name) = filter_value(query.name.as_ref()) {
            cond = cond.add(contains_ci(Column::Name, name));
        }
        if let Some(email) = filter_value(query.email.as_ref()) {
            cond = cond.add(contains_ci(Column::Email, email));
        }
        if let Some(address) = filter_value(query.address.as_ref()) {
            cond = cond.add(contains_ci(Column::Address, address));
        }

        let sort_col = match query.sort_by {
            UserSortField::Name => Column::Name,
            UserSortField::Email => Column::Email,
            UserSortField::Address => Column::Address,
            UserSortField::Role => Column::Role,
            UserSortField::CreatedAt => Column::CreatedAt,
        };

        let rows = UserEntity::find()
            .filter(cond)
            .order_by(sort_col, order(query.sort_order))
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_many<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[Uuid],
    ) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = UserEntity::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_non_admin<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<u64, DomainError> {
        UserEntity::find()
            .filter(Column::Role.is_in([RoleColumn::User, RoleColumn::StoreOwner]))
            .count(conn)
            .await
            .map_err(db_err)
    }
}
