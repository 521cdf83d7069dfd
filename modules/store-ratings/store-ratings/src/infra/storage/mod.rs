//! Infrastructure storage layer - all SeaORM code lives here.
//!
//! - `entity/` - SeaORM entities for `users`, `stores` and `ratings`
//! - `mapper.rs` - conversions between entity models and SDK contract types
//! - `migrations/` - schema migrations, one SQL script per backend
//! - `*_sea_repo.rs` - implementations of the domain repository traits

pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;

mod ratings_sea_repo;
mod stores_sea_repo;
mod users_sea_repo;

pub use ratings_sea_repo::OrmRatingsRepository;
pub use stores_sea_repo::OrmStoresRepository;
pub use users_sea_repo::OrmUsersRepository;
