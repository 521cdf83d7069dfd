//! Listing queries: filters, sort fields and sort order.
//!
//! Sort fields are closed enums so an arbitrary client string can never
//! reach the database as a column name.

use serde::Deserialize;

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum StoreSortField {
    #[default]
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "address")]
    Address,
    #[serde(rename = "averageRating")]
    AverageRating,
    #[serde(rename = "totalRatings")]
    TotalRatings,
    #[serde(rename = "createdAt")]
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum UserSortField {
    #[default]
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "address")]
    Address,
    #[serde(rename = "role")]
    Role,
    #[serde(rename = "createdAt")]
    CreatedAt,
}

/// Role filter of the admin user listing. `all` matches every non-admin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum RoleFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "storeOwner")]
    StoreOwner,
}

impl RoleFilter {
    #[must_use]
    pub const fn role(self) -> Option<Role> {
        match self {
            Self::All => None,
            Self::Admin => Some(Role::Admin),
            Self::User => Some(Role::User),
            Self::StoreOwner => Some(Role::StoreOwner),
        }
    }
}

/// End-user store search: `search` matches name or address, case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreSearchQuery {
    pub search: Option<String>,
    pub sort_by: StoreSortField,
    pub sort_order: SortOrder,
}

/// Admin store listing with per-field substring filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreAdminQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub sort_by: StoreSortField,
    pub sort_order: SortOrder,
}

/// Admin user listing with per-field substring filters and a role filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserListQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: RoleFilter,
    pub sort_by: UserSortField,
    pub sort_order: SortOrder,
}
