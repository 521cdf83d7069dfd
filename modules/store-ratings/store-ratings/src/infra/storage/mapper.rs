//! Conversions between SeaORM models and SDK contract types.

use store_ratings_sdk::{Rating, RatingValue, Role, Store, User};

use crate::domain::error::DomainError;
use crate::domain::repos::UserCredentials;
use crate::infra::storage::entity::user::RoleColumn;
use crate::infra::storage::entity::{rating, store, user};

impl From<Role> for RoleColumn {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
            Role::StoreOwner => Self::StoreOwner,
        }
    }
}

impl From<RoleColumn> for Role {
    fn from(role: RoleColumn) -> Self {
        match role {
            RoleColumn::Admin => Self::Admin,
            RoleColumn::User => Self::User,
            RoleColumn::StoreOwner => Self::StoreOwner,
        }
    }
}

/// The password hash is dropped here; use [`UserCredentials`] to keep it.
impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            address: m.address,
            role: m.role.into(),
            store_id: m.store_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<user::Model> for UserCredentials {
    fn from(mut m: user::Model) -> Self {
        let password_hash = std::mem::take(&mut m.password_hash);
        Self {
            user: m.into(),
            password_hash,
        }
    }
}

impl From<store::Model> for Store {
    fn from(m: store::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            address: m.address,
            owner_id: m.owner_id,
            average_rating: m.average_rating,
            // Never negative: only written from an `Aggregate`.
            total_ratings: u32::try_from(m.total_ratings).unwrap_or_default(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn rating_value(raw: i16) -> Result<RatingValue, DomainError> {
    u8::try_from(raw)
        .ok()
        .and_then(RatingValue::new)
        .ok_or_else(|| DomainError::internal(format!("stored rating value {raw} is out of range")))
}

impl TryFrom<rating::Model> for Rating {
    type Error = DomainError;

    fn try_from(m: rating::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            user_id: m.user_id,
            store_id: m.store_id,
            value: rating_value(m.value)?,
            comment: m.comment,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn role_column_matches_sdk_role() {
        for role in [Role::Admin, Role::User, Role::StoreOwner] {
            assert_eq!(Role::from(RoleColumn::from(role)), role);
        }
    }

    #[test]
    fn corrupt_rating_value_is_an_error() {
        assert_eq!(rating_value(4).unwrap().get(), 4);
        assert!(rating_value(0).is_err());
        assert!(rating_value(-3).is_err());
        assert!(rating_value(300).is_err());
    }
}
