// Core modules
pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod types;
mod utils;

// Re-export key types and functions
pub use api::{AppState, create_router};
pub use auth::{AuthConfig, AuthError, AuthExtractor, TokenService, UserContext, UserStore};
pub use catalog::{Catalog, CatalogError};
pub use config::{BootstrapAdmin, ServiceConfig};
pub use db::{DatabaseConfig, Db, create_connection, ensure_schema};
pub use types::{AuthorId, BookId, Role, UserId};

use anyhow::Result;
use axum::Router;
use tracing::info;

use db::schema::UserCreate;

/// Connect to the database, prepare the schema and assemble shared state.
///
/// Creates the configured bootstrap administrator if its email is unknown.
pub async fn build_state(config: &ServiceConfig) -> Result<AppState> {
    config.auth.validate()?;

    let db = create_connection(config.database.clone()).await?;
    ensure_schema(&db).await?;
    info!("Connected to database at {}", config.database.url);

    let auth = AuthExtractor::new(config.auth.clone(), db.clone());

    if let Some(admin) = &config.bootstrap_admin {
        let user = auth
            .user_store()
            .ensure_user(&UserCreate {
                name: admin.name.clone(),
                email: admin.email.clone(),
                password: admin.password.clone(),
                role: Role::Admin,
            })
            .await?;
        info!("Bootstrap administrator ready: {}", user.email);
    }

    Ok(AppState::new(Catalog::new(db), auth))
}

/// Convenience function to create the fully configured HTTP application.
pub async fn build_app(config: &ServiceConfig) -> Result<Router> {
    let state = build_state(config).await?;
    Ok(create_router(state))
}
