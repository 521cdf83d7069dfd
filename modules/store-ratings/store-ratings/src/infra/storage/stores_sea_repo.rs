use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use store_ratings_sdk::{SortOrder, Store, StoreAdminQuery, StoreSearchQuery, StoreSortField};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::aggregation::Aggregate;
use crate::domain::error::DomainError;
use crate::domain::repos::StoresRepository;
use crate::infra::storage::db::{contains_ci, db_err, filter_value, is_unique_violation, order};
use crate::infra::storage::entity::store::{ActiveModel as StoreAM, Column, Entity as StoreEntity};

/// ORM-based implementation of the `StoresRepository` trait.
#[derive(Clone, Default)]
pub struct OrmStoresRepository;

impl OrmStoresRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn sorted(select: Select<StoreEntity>, field: StoreSortField, dir: SortOrder) -> Select<StoreEntity> {
    let col = match field {
        StoreSortField::Name => Column::Name,
        StoreSortField::Email => Column::Email,
        StoreSortField::Address => Column::Address,
        StoreSortField::AverageRating => Column::AverageRating,
        StoreSortField::TotalRatings => Column::TotalRatings,
        StoreSortField::CreatedAt => Column::CreatedAt,
    };
    select.order_by(col, order(dir)).order_by_asc(Column::Id)
}

#[async_trait]
impl StoresRepository for OrmStoresRepository {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Store>, DomainError> {
        let found = StoreEntity::find_by_id(id).one(conn).await.map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn email_exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<bool, DomainError> {
        let count = StoreEntity::find()
            .filter(Column::Email.eq(email))
            .count(conn)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        store: Store,
    ) -> Result<Store, DomainError> {
        let m = StoreAM {
            id: Set(store.id),
            name: Set(store.name.clone()),
            email: Set(store.email.clone()),
            address: Set(store.address.clone()),
            owner_id: Set(store.owner_id),
            average_rating: Set(store.average_rating),
            total_ratings: Set(i32::try_from(store.total_ratings).unwrap_or(i32::MAX)),
            created_at: Set(store.created_at),
            updated_at: Set(store.updated_at),
        };

        match m.insert(conn).await {
            Ok(_) => Ok(store),
            Err(e) if is_unique_violation(&e) => {
                Err(DomainError::email_already_exists("email", store.email))
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn update_aggregate<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        aggregate: Aggregate,
        at: OffsetDateTime,
    ) -> Result<bool, DomainError> {
        let total = i32::try_from(aggregate.total_ratings).unwrap_or(i32::MAX);
        let result = StoreEntity::update_many()
            .col_expr(Column::AverageRating, Expr::value(aggregate.average_rating))
            .col_expr(Column::TotalRatings, Expr::value(total))
            .col_expr(Column::UpdatedAt, Expr::value(at))
            .filter(Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn search<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        query: &StoreSearchQuery,
    ) -> Result<Vec<Store>, DomainError> {
        let mut select = StoreEntity::find();
        if let Some(needle) = filter_value(query.search.as_ref()) {
            select = select.filter(
                Condition::any()
                    .add(contains_ci(Column::Name, needle))
                    .add(contains_ci(Column::Address, needle)),
            );
        }

        let rows = sorted(select, query.sort_by, query.sort_order)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_admin<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        query: &StoreAdminQuery,
    ) -> Result<Vec<Store>, DomainError> {
        let mut cond = Condition::all();
        if let Some(name) = filter_value(query.name.as_ref()) {
            cond = cond.add(contains_ci(Column::Name, name));
        }
        if let Some(email) = filter_value(query.email.as_ref()) {
            cond = cond.add(contains_ci(Column::Email, email));
        }
        if let Some(address) = filter_value(query.address.as_ref()) {
            cond = cond.add(contains_ci(Column::Address, address));
        }

        let rows = sorted(StoreEntity::find().filter(cond), query.sort_by, query.sort_order)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_many<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[Uuid],
    ) -> Result<Vec<Store>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = StoreEntity::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<u64, DomainError> {
        StoreEntity::find().count(conn).await.map_err(db_err)
    }
}
