//! Store Ratings Module
//!
//! End users rate stores from 1 to 5 stars, store owners read the aggregated
//! feedback for their store, administrators manage users and stores.
//!
//! ## Layout
//!
//! - `domain` - business rules: validation, the services, the rating aggregation engine
//! - `auth` - the authorization gate: bearer token -> principal -> role check
//! - `infra` - SeaORM entities, migrations and repository implementations
//! - `api` - axum handlers, DTOs and RFC 9457 error mapping
//!
//! The public contract types live in `store-ratings-sdk` and are re-exported here.

pub use store_ratings_sdk::{Rating, RatingValue, Role, Store, User};

pub mod module;
pub use module::StoreRatingsModule;

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
