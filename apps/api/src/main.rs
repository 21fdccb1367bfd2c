//! Taskhub API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use taskhub_core::AppError;
use taskhub_infrastructure::Argon2PasswordHasher;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, init_tracing};
use crate::api_services::{StoragePorts, build_app_state, connect_and_migrate};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let ports = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = connect_and_migrate(database_url).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }

            StoragePorts::postgres(pool)
        }
        None => {
            warn!("DATABASE_URL is not set; state is kept in memory and lost on exit");
            StoragePorts::in_memory()
        }
    };

    let app_state = build_app_state(
        ports,
        Arc::new(Argon2PasswordHasher::new()),
        config.access_token_ttl(),
    )?;
    let app = api_router::build_router(app_state, config.cors_allowed_origin.as_str())?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "taskhub-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
