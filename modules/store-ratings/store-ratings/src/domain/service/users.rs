use std::collections::HashMap;

use store_ratings_sdk::{
    DashboardStats, NewUser, Role, Store, StoreSummary, User, UserListQuery, UserWithStore,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::Service;
use crate::domain::error::DomainError;
use crate::domain::repos::{RatingsRepository, StoresRepository, UsersRepository};

impl<UR, SR, RR> Service<UR, SR, RR>
where
    UR: UsersRepository,
    SR: StoresRepository,
    RR: RatingsRepository,
{
    /// Admin dashboard counters. Admin accounts are not counted as users.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardStats, DomainError> {
        debug!("Computing dashboard counters");
        Ok(DashboardStats {
            total_users: self.users.count_non_admin(&self.db).await?,
            total_stores: self.stores.count(&self.db).await?,
            total_ratings: self.ratings.count(&self.db).await?,
        })
    }

    #[instrument(skip(self, query))]
    pub async fn list_users(&self, query: &UserListQuery) -> Result<Vec<UserWithStore>, DomainError> {
        debug!("Listing users");

        let users = self.users.list(&self.db, query).await?;
        let store_ids: Vec<Uuid> = users.iter().filter_map(|u| u.store_id).collect();
        let stores: HashMap<Uuid, Store> = self
            .stores
            .get_many(&self.db, &store_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(users
            .into_iter()
            .map(|user| {
                let store = user
                    .store_id
                    .and_then(|id| stores.get(&id))
                    .map(store_summary);
                UserWithStore { user, store }
            })
            .collect())
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<UserWithStore, DomainError> {
        debug!("Getting user by id");

        let user = self
            .users
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        let store = match user.store_id {
            Some(store_id) => self
                .stores
                .get(&self.db, store_id)
                .await?
                .as_ref()
                .map(store_summary),
            None => None,
        };

        Ok(UserWithStore { user, store })
    }

    /// Admin account creation with an explicit role.
    ///
    /// A store owner must name an existing store. Linking the store back to
    /// the owner is the job of store provisioning, not of this operation.
    #[instrument(skip_all, fields(role = %new_user.role))]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating user");

        let store_id = match (new_user.role, new_user.store_id) {
            (Role::StoreOwner, None) => {
                return Err(DomainError::validation(
                    "storeId",
                    "Store ID is required for store owners",
                ));
            }
            (Role::StoreOwner, Some(store_id)) => {
                if self.stores.get(&self.db, store_id).await?.is_none() {
                    return Err(DomainError::store_not_found(store_id));
                }
                Some(store_id)
            }
            (Role::Admin | Role::User, _) => None,
        };

        let user = self
            .create_account(NewUser {
                store_id,
                ..new_user
            })
            .await?;

        info!(user_id = %user.id, "Created user");
        Ok(user)
    }
}

fn store_summary(store: &Store) -> StoreSummary {
    StoreSummary {
        id: store.id,
        name: store.name.clone(),
        average_rating: store.average_rating,
    }
}
