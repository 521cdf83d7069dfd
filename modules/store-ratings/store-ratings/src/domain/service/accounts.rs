use store_ratings_sdk::{AuthSession, NewUser, Role, User};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::Service;
use crate::domain::error::DomainError;
use crate::domain::repos::{RatingsRepository, StoresRepository, UsersRepository};
use crate::domain::validation::normalize_email;

impl<UR, SR, RR> Service<UR, SR, RR>
where
    UR: UsersRepository,
    SR: StoresRepository,
    RR: RatingsRepository,
{
    /// Self-service sign-up. The account always gets role `user` and no store link.
    #[instrument(skip_all)]
    pub async fn register(&self, new_user: NewUser) -> Result<AuthSession, DomainError> {
        info!("Registering new user");

        let user = self
            .create_account(NewUser {
                role: Role::User,
                store_id: None,
                ..new_user
            })
            .await?;
        let token = self.issue_token(user.id)?;

        info!(user_id = %user.id, "Registered new user");
        Ok(AuthSession { token, user })
    }

    /// Unknown email and wrong password fail identically.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, DomainError> {
        if email.trim().is_empty() {
            return Err(DomainError::validation("email", "Email is required"));
        }
        if password.is_empty() {
            return Err(DomainError::validation("password", "Password is required"));
        }

        let Some(creds) = self
            .users
            .find_credentials_by_email(&self.db, &normalize_email(email))
            .await?
        else {
            debug!("Login for unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &creds.password_hash).await? {
            debug!(user_id = %creds.user.id, "Login with wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.issue_token(creds.user.id)?;
        info!(user_id = %creds.user.id, "User logged in");
        Ok(AuthSession {
            token,
            user: creds.user,
        })
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn current_user(&self, id: Uuid) -> Result<User, DomainError> {
        debug!("Loading current user");
        self.users
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(skip(self, current_password, new_password), fields(user_id = %id))]
    pub async fn change_password(
        &self,
        id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        info!("Changing password");

        self.validator.password("newPassword", new_password)?;

        let creds = self
            .users
            .get_credentials(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        if !self
            .hasher
            .verify(current_password, &creds.password_hash)
            .await?
        {
            return Err(DomainError::WrongCurrentPassword);
        }

        let hash = self.hasher.hash(new_password).await?;
        if !self.users.set_password_hash(&self.db, id, &hash).await? {
            return Err(DomainError::user_not_found(id));
        }

        info!("Password changed");
        Ok(())
    }

    /// Validate, check email availability, hash and insert one account.
    pub(super) async fn create_account(&self, new_user: NewUser) -> Result<User, DomainError> {
        let name = self.validator.user_name("name", &new_user.name)?;
        let email = self.validator.email("email", &new_user.email)?;
        self.validator.password("password", &new_user.password)?;
        let address = self.validator.address("address", &new_user.address)?;

        if self.users.email_exists(&self.db, &email).await? {
            return Err(DomainError::email_already_exists("email", email));
        }

        let password_hash = self.hasher.hash(&new_user.password).await?;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::now_v7(),
            name,
            email,
            address,
            role: new_user.role,
            store_id: new_user.store_id,
            created_at: now,
            updated_at: now,
        };

        self.users.create(&self.db, user, &password_hash).await
    }

    fn issue_token(&self, user_id: Uuid) -> Result<String, DomainError> {
        self.tokens
            .issue(user_id)
            .map_err(|e| DomainError::internal(e.to_string()))
    }
}
