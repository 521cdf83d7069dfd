use store_ratings_sdk::{Role, User};
use uuid::Uuid;

use super::error::AuthError;

/// Identity resolved from a valid bearer token, attached to request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
    pub store_id: Option<Uuid>,
}

impl Principal {
    /// # Errors
    /// [`AuthError::Forbidden`] when the principal holds a different role.
    pub fn require_role(&self, required: Role) -> Result<(), AuthError> {
        match (self.role, required) {
            (Role::Admin, Role::Admin)
            | (Role::User, Role::User)
            | (Role::StoreOwner, Role::StoreOwner) => Ok(()),
            (Role::Admin | Role::User | Role::StoreOwner, _) => {
                Err(AuthError::Forbidden { required })
            }
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            store_id: user.store_id,
        }
    }
}
