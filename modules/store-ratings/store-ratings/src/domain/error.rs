use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Email '{email}' is already registered ({field})")]
    EmailAlreadyExists { field: String, email: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Store not found: {id}")]
    StoreNotFound { id: Uuid },

    #[error("No rating by this user for store {store_id}")]
    RatingNotFound { store_id: Uuid },

    #[error("Store owner {owner_id} has no linked store")]
    OwnerHasNoStore { owner_id: Uuid },

    #[error("A rating for this user and store already exists")]
    RatingAlreadyExists,

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn email_already_exists(field: impl Into<String>, email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            field: field.into(),
            email: email.into(),
        }
    }

    #[must_use]
    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    #[must_use]
    pub fn store_not_found(id: Uuid) -> Self {
        Self::StoreNotFound { id }
    }

    #[must_use]
    pub fn rating_not_found(store_id: Uuid) -> Self {
        Self::RatingNotFound { store_id }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
