use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::routes::{self, ConcreteService};
use crate::auth::{AuthGate, JwtCodec, PrincipalResolver};
use crate::config::{AuthConfig, StoreRatingsConfig};
use crate::domain::password::PasswordHasher;
use crate::domain::validation::Validator;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{OrmRatingsRepository, OrmStoresRepository, OrmUsersRepository};

/// The store-ratings module: the domain service plus the authorization gate
/// that fronts its REST endpoints.
pub struct StoreRatingsModule {
    service: Arc<ConcreteService>,
    resolver: Arc<dyn PrincipalResolver>,
}

impl StoreRatingsModule {
    /// Wire repositories, the token codec, the password hasher and the gate
    /// around a single connection pool.
    ///
    /// # Errors
    /// Fails when the token secret is empty, the hash parameters are invalid,
    /// or a validation limit exceeds its column width.
    pub fn init(
        db: DatabaseConnection,
        config: &StoreRatingsConfig,
        auth: &AuthConfig,
    ) -> anyhow::Result<Self> {
        info!("Initializing store-ratings module");

        config
            .limits
            .check_column_widths()
            .context("invalid validation limits")?;
        let tokens = Arc::new(JwtCodec::new(auth).context("invalid auth configuration")?);
        let hasher =
            PasswordHasher::new(config.password_hash).context("invalid password_hash settings")?;

        let users = Arc::new(OrmUsersRepository::new());
        let resolver: Arc<dyn PrincipalResolver> = Arc::new(AuthGate::new(
            db.clone(),
            Arc::clone(&users),
            Arc::clone(&tokens),
        ));

        let service = ConcreteService::new(
            db,
            users,
            Arc::new(OrmStoresRepository::new()),
            Arc::new(OrmRatingsRepository::new()),
            Validator::new(config.limits),
            hasher,
            tokens,
        );

        info!("Store-ratings module initialized");
        Ok(Self {
            service: Arc::new(service),
            resolver,
        })
    }

    /// Apply pending schema migrations.
    ///
    /// # Errors
    /// Propagates migration failures.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running store-ratings database migrations");
        Migrator::up(db, None)
            .await
            .context("store-ratings migrations failed")?;
        info!("Store-ratings database migrations completed successfully");
        Ok(())
    }

    #[must_use]
    pub fn service(&self) -> Arc<ConcreteService> {
        Arc::clone(&self.service)
    }

    #[must_use]
    pub fn resolver(&self) -> Arc<dyn PrincipalResolver> {
        Arc::clone(&self.resolver)
    }

    /// Mount the REST endpoints on `router`.
    #[must_use]
    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering store-ratings REST routes");
        routes::register_routes(router, self.service(), self.resolver())
    }
}
