//! Store Ratings SDK
//!
//! Contract types for the `store-ratings` module:
//! - Identity, store and rating models
//! - The closed [`Role`] enumeration used by the authorization gate
//! - Listing queries (filters, sort fields, sort order)
//! - Read views returned by dashboards
//!
//! The types here are transport-agnostic; the REST layer maps them to DTOs.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod models;
pub mod query;

pub use models::{
    AuthSession, DashboardStats, NewStore, NewStoreOwner, NewUser, OwnerSummary,
    ProvisionedStore, RaterSummary, Rating, RatingSubmission, RatingValue, RatingWithRater, Role,
    RoleParseError, Store, StoreForUser, StoreRatingsReport, StoreSummary, StoreWithOwner,
    SubmittedRating, User, UserWithStore,
};
pub use query::{
    RoleFilter, SortOrder, StoreAdminQuery, StoreSearchQuery, StoreSortField, UserListQuery,
    UserSortField,
};
