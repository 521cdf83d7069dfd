//! Domain layer - business rules of the store ratings module.
//!
//! The domain layer MUST NOT import `api::*`. Persistence is reached only
//! through the repository traits in [`repos`].

pub mod aggregation;
pub mod error;
pub mod password;
pub mod repos;
pub mod service;
pub mod validation;
