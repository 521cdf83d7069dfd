use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use store_ratings_sdk::{Rating, RatingValue};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::RatingsRepository;
use crate::infra::storage::db::{db_err, is_unique_violation};
use crate::infra::storage::entity::rating::{
    ActiveModel as RatingAM, Column, Entity as RatingEntity,
};
use crate::infra::storage::mapper::rating_value;

/// ORM-based implementation of the `RatingsRepository` trait.
#[derive(Clone, Default)]
pub struct OrmRatingsRepository;

impl OrmRatingsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn active_model(rating: &Rating) -> RatingAM {
    RatingAM {
        id: Set(rating.id),
        user_id: Set(rating.user_id),
        store_id: Set(rating.store_id),
        value: Set(i16::from(rating.value.get())),
        comment: Set(rating.comment.clone()),
        created_at: Set(rating.created_at),
        updated_at: Set(rating.updated_at),
    }
}

#[async_trait]
impl RatingsRepository for OrmRatingsRepository {
    async fn find_by_user_and_store<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        store_id: Uuid,
    ) -> Result<Option<Rating>, DomainError> {
        RatingEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::StoreId.eq(store_id))
            .one(conn)
            .await
            .map_err(db_err)?
            .map(Rating::try_from)
            .transpose()
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        rating: Rating,
    ) -> Result<Rating, DomainError> {
        match active_model(&rating).insert(conn).await {
            Ok(_) => Ok(rating),
            Err(e) if is_unique_violation(&e) => Err(DomainError::RatingAlreadyExists),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        rating: Rating,
    ) -> Result<Rating, DomainError> {
        let m = RatingAM {
            id: Set(rating.id),
            value: Set(i16::from(rating.value.get())),
            comment: Set(rating.comment.clone()),
            updated_at: Set(rating.updated_at),
            ..Default::default()
        };
        let _ = m.update(conn).await.map_err(db_err)?;
        Ok(rating)
    }

    async fn delete_by_user_and_store<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        store_id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = RatingEntity::delete_many()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::StoreId.eq(store_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn values_for_store<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        store_id: Uuid,
    ) -> Result<Vec<RatingValue>, DomainError> {
        let raw: Vec<i16> = RatingEntity::find()
            .select_only()
            .column(Column::Value)
            .filter(Column::StoreId.eq(store_id))
            .into_tuple()
            .all(conn)
            .await
            .map_err(db_err)?;
        raw.into_iter().map(rating_value).collect()
    }

    async fn list_for_store<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        store_id: Uuid,
    ) -> Result<Vec<Rating>, DomainError> {
        RatingEntity::find()
            .filter(Column::StoreId.eq(store_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(Rating::try_from)
            .collect()
    }

    async fn for_user_and_stores<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        store_ids: &[Uuid],
    ) -> Result<Vec<Rating>, DomainError> {
        if store_ids.is_empty() {
            return Ok(Vec::new());
        }
        RatingEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::StoreId.is_in(store_ids.iter().copied()))
            .all(conn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(Rating::try_from)
            .collect()
    }

    async fn count<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<u64, DomainError> {
        RatingEntity::find().count(conn).await.map_err(db_err)
    }
}
