//! Domain service - business rules on top of the repositories.
//!
//! Split by area, each file adding an `impl` block to [`Service`]:
//! - `accounts` - registration, login, current user, password change
//! - `users` - admin dashboard, user listing and creation
//! - `stores` - store listings and store + owner provisioning
//! - `ratings` - rating upsert/delete, the owner's report and aggregate recompute

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::JwtCodec;
use crate::domain::password::PasswordHasher;
use crate::domain::repos::{RatingsRepository, StoresRepository, UsersRepository};
use crate::domain::validation::Validator;

mod accounts;
mod ratings;
mod stores;
mod users;

/// Domain service over the three repositories.
///
/// Holds the connection pool handle; there is no global connection.
pub struct Service<UR, SR, RR>
where
    UR: UsersRepository,
    SR: StoresRepository,
    RR: RatingsRepository,
{
    db: DatabaseConnection,
    users: Arc<UR>,
    stores: Arc<SR>,
    ratings: Arc<RR>,
    validator: Validator,
    hasher: PasswordHasher,
    tokens: Arc<JwtCodec>,
}

impl<UR, SR, RR> Service<UR, SR, RR>
where
    UR: UsersRepository,
    SR: StoresRepository,
    RR: RatingsRepository,
{
    pub fn new(
        db: DatabaseConnection,
        users: Arc<UR>,
        stores: Arc<SR>,
        ratings: Arc<RR>,
        validator: Validator,
        hasher: PasswordHasher,
        tokens: Arc<JwtCodec>,
    ) -> Self {
        Self {
            db,
            users,
            stores,
            ratings,
            validator,
            hasher,
            tokens,
        }
    }
}
