use std::collections::HashMap;

use store_ratings_sdk::{
    RaterSummary, Rating, RatingSubmission, RatingWithRater, StoreRatingsReport, SubmittedRating,
    User,
};
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::Service;
use crate::domain::aggregation::{Aggregate, compute_aggregate};
use crate::domain::error::DomainError;
use crate::domain::repos::{RatingsRepository, StoresRepository, UsersRepository};
use crate::domain::validation::ValidRating;

impl<UR, SR, RR> Service<UR, SR, RR>
where
    UR: UsersRepository,
    SR: StoresRepository,
    RR: RatingsRepository,
{
    /// Create or overwrite the caller's rating of a store, then refresh the
    /// store aggregate.
    #[instrument(skip(self, submission), fields(user_id = %user_id))]
    pub async fn submit_rating(
        &self,
        user_id: Uuid,
        submission: RatingSubmission,
    ) -> Result<SubmittedRating, DomainError> {
        let valid = self.validator.rating(submission)?;
        info!(store_id = %valid.store_id, "Submitting rating");

        if self.stores.get(&self.db, valid.store_id).await?.is_none() {
            return Err(DomainError::store_not_found(valid.store_id));
        }

        let existing = self
            .ratings
            .find_by_user_and_store(&self.db, user_id, valid.store_id)
            .await?;

        let submitted = match existing {
            Some(current) => SubmittedRating {
                rating: self.overwrite_rating(current, &valid).await?,
                created: false,
            },
            None => self.insert_rating(user_id, &valid).await?,
        };

        self.refresh_store_aggregate(valid.store_id).await;

        info!(
            rating_id = %submitted.rating.id,
            created = submitted.created,
            "Rating stored"
        );
        Ok(submitted)
    }

    /// Remove the caller's rating of a store and refresh the store aggregate.
    #[instrument(skip(self), fields(user_id = %user_id, store_id = %store_id))]
    pub async fn delete_rating(&self, user_id: Uuid, store_id: Uuid) -> Result<(), DomainError> {
        info!("Deleting rating");

        if !self
            .ratings
            .delete_by_user_and_store(&self.db, user_id, store_id)
            .await?
        {
            return Err(DomainError::rating_not_found(store_id));
        }

        self.refresh_store_aggregate(store_id).await;
        Ok(())
    }

    /// Ratings of the owner's store, newest first, with rater details and
    /// the cached aggregate.
    #[instrument(skip(self), fields(owner_id = %owner_id))]
    pub async fn owner_store_ratings(
        &self,
        owner_id: Uuid,
        owner_store_id: Option<Uuid>,
    ) -> Result<StoreRatingsReport, DomainError> {
        debug!("Loading ratings of owner's store");

        let store_id = owner_store_id.ok_or(DomainError::OwnerHasNoStore { owner_id })?;
        let store = self
            .stores
            .get(&self.db, store_id)
            .await?
            .ok_or_else(|| DomainError::store_not_found(store_id))?;

        let ratings = self.ratings.list_for_store(&self.db, store_id).await?;
        let rater_ids: Vec<Uuid> = ratings.iter().map(|r| r.user_id).collect();
        let raters: HashMap<Uuid, User> = self
            .users
            .get_many(&self.db, &rater_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(StoreRatingsReport {
            store_id,
            ratings: ratings
                .into_iter()
                .map(|rating| RatingWithRater {
                    rater: raters.get(&rating.user_id).map(|u| RaterSummary {
                        id: u.id,
                        name: u.name.clone(),
                        email: u.email.clone(),
                        address: u.address.clone(),
                    }),
                    rating,
                })
                .collect(),
            average_rating: store.average_rating,
            total_ratings: store.total_ratings,
        })
    }

    /// Rebuild a store's cached aggregate from all of its ratings.
    ///
    /// # Errors
    /// [`DomainError::StoreNotFound`] if the store disappeared, or a storage error.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn recompute_store_aggregate(&self, store_id: Uuid) -> Result<Aggregate, DomainError> {
        let values = self.ratings.values_for_store(&self.db, store_id).await?;
        let aggregate = compute_aggregate(&values);

        let updated = self
            .stores
            .update_aggregate(&self.db, store_id, aggregate, OffsetDateTime::now_utc())
            .await?;
        if !updated {
            return Err(DomainError::store_not_found(store_id));
        }

        debug!(
            average_rating = aggregate.average_rating,
            total_ratings = aggregate.total_ratings,
            "Store aggregate recomputed"
        );
        Ok(aggregate)
    }

    /// The rating write has already succeeded; a failed recompute is logged only.
    async fn refresh_store_aggregate(&self, store_id: Uuid) {
        if let Err(e) = self.recompute_store_aggregate(store_id).await {
            warn!(store_id = %store_id, error = %e, "Failed to recompute store aggregate");
        }
    }

    async fn overwrite_rating(
        &self,
        current: Rating,
        valid: &ValidRating,
    ) -> Result<Rating, DomainError> {
        let rating = Rating {
            value: valid.value,
            comment: valid.comment.clone(),
            updated_at: OffsetDateTime::now_utc(),
            ..current
        };
        self.ratings.update(&self.db, rating).await
    }

    async fn insert_rating(
        &self,
        user_id: Uuid,
        valid: &ValidRating,
    ) -> Result<SubmittedRating, DomainError> {
        let now = OffsetDateTime::now_utc();
        let rating = Rating {
            id: Uuid::now_v7(),
            user_id,
            store_id: valid.store_id,
            value: valid.value,
            comment: valid.comment.clone(),
            created_at: now,
            updated_at: now,
        };

        match self.ratings.insert(&self.db, rating).await {
            Ok(rating) => Ok(SubmittedRating {
                rating,
                created: true,
            }),
            // A concurrent submission for the same pair won the insert.
            Err(DomainError::RatingAlreadyExists) => {
                let current = self
                    .ratings
                    .find_by_user_and_store(&self.db, user_id, valid.store_id)
                    .await?
                    .ok_or_else(|| DomainError::rating_not_found(valid.store_id))?;
                Ok(SubmittedRating {
                    rating: self.overwrite_rating(current, valid).await?,
                    created: false,
                })
            }
            Err(e) => Err(e),
        }
    }
}
