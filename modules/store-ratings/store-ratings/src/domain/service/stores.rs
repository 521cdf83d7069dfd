use std::collections::HashMap;

use sea_orm::TransactionTrait;
use store_ratings_sdk::{
    NewStore, NewStoreOwner, OwnerSummary, ProvisionedStore, Role, Store, StoreAdminQuery,
    StoreForUser, StoreSearchQuery, StoreWithOwner, User,
};
use time::OffsetDateTime;
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
    /// Store browsing. End users also get their own rating of each store.
    #[instrument(skip(self, query), fields(viewer_id = %viewer_id, viewer_role = %viewer_role))]
    pub async fn list_stores(
        &self,
        viewer_id: Uuid,
        viewer_role: Role,
        query: &StoreSearchQuery,
    ) -> Result<Vec<StoreForUser>, DomainError> {
        debug!("Listing stores");

        let stores = self.stores.search(&self.db, query).await?;

        let own_ratings: HashMap<Uuid, _> = match viewer_role {
            Role::User => {
                let ids: Vec<Uuid> = stores.iter().map(|s| s.id).collect();
                self.ratings
                    .for_user_and_stores(&self.db, viewer_id, &ids)
                    .await?
                    .into_iter()
                    .map(|r| (r.store_id, r.value))
                    .collect()
            }
            Role::Admin | Role::StoreOwner => HashMap::new(),
        };

        Ok(stores
            .into_iter()
            .map(|store| StoreForUser {
                user_rating: own_ratings.get(&store.id).copied(),
                store,
            })
            .collect())
    }

    #[instrument(skip(self, query))]
    pub async fn list_stores_admin(
        &self,
        query: &StoreAdminQuery,
    ) -> Result<Vec<StoreWithOwner>, DomainError> {
        debug!("Listing stores for admin");

        let stores = self.stores.list_admin(&self.db, query).await?;
        let owner_ids: Vec<Uuid> = stores.iter().map(|s| s.owner_id).collect();
        let owners: HashMap<Uuid, User> = self
            .users
            .get_many(&self.db, &owner_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(stores
            .into_iter()
            .map(|store| StoreWithOwner {
                owner: owners.get(&store.owner_id).map(|u| OwnerSummary {
                    id: u.id,
                    name: u.name.clone(),
                    email: u.email.clone(),
                }),
                store,
            })
            .collect())
    }

    /// Create a store together with its owner account.
    ///
    /// Owner insert, store insert and the owner -> store link run in one
    /// transaction; any failure leaves neither record behind.
    #[instrument(skip_all)]
    pub async fn provision_store(
        &self,
        store: NewStore,
        owner: NewStoreOwner,
    ) -> Result<ProvisionedStore, DomainError> {
        info!("Provisioning store with owner");

        let store_name = self.validator.store_name("name", &store.name)?;
        let store_email = self.validator.email("email", &store.email)?;
        let store_address = self.validator.address("address", &store.address)?;
        let owner_name = self.validator.user_name("ownerName", &owner.name)?;
        let owner_email = self.validator.email("ownerEmail", &owner.email)?;
        self.validator.password("ownerPassword", &owner.password)?;
        let owner_address = self.validator.address("ownerAddress", &owner.address)?;

        if self.stores.email_exists(&self.db, &store_email).await? {
            return Err(DomainError::email_already_exists("email", store_email));
        }
        if self.users.email_exists(&self.db, &owner_email).await? {
            return Err(DomainError::email_already_exists("ownerEmail", owner_email));
        }

        let password_hash = self.hasher.hash(&owner.password).await?;
        let now = OffsetDateTime::now_utc();
        let owner_id = Uuid::now_v7();
        let store_id = Uuid::now_v7();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        let mut owner = self
            .users
            .create(
                &txn,
                User {
                    id: owner_id,
                    name: owner_name,
                    email: owner_email,
                    address: owner_address,
                    role: Role::StoreOwner,
                    store_id: None,
                    created_at: now,
                    updated_at: now,
                },
                &password_hash,
            )
            .await
            .map_err(|e| match e {
                DomainError::EmailAlreadyExists { email, .. } => {
                    DomainError::email_already_exists("ownerEmail", email)
                }
                other => other,
            })?;

        let store = self
            .stores
            .create(
                &txn,
                Store {
                    id: store_id,
                    name: store_name,
                    email: store_email,
                    address: store_address,
                    owner_id,
                    average_rating: 0.0,
                    total_ratings: 0,
                    created_at: now,
                    updated_at: now,
                },
            )
            .await?;

        if !self.users.set_store_link(&txn, owner_id, store_id).await? {
            return Err(DomainError::internal("store owner vanished during provisioning"));
        }
        owner.store_id = Some(store_id);

        txn.commit()
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(store_id = %store.id, owner_id = %owner.id, "Provisioned store");
        Ok(ProvisionedStore { store, owner })
    }
}
