//! Repository traits for the three persisted entities.
//!
//! All methods take a generic `conn: &C`, so the same repository runs on the
//! pooled `DatabaseConnection` or inside a `DatabaseTransaction`.

mod ratings_repo;
mod stores_repo;
mod users_repo;

pub use ratings_repo::RatingsRepository;
pub use stores_repo::StoresRepository;
pub use users_repo::{UserCredentials, UsersRepository};
