use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use taskhub_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: Option<String>,
    pub api_host: String,
    pub api_port: u16,
    pub access_token_ttl_minutes: i64,
    pub cors_allowed_origin: String,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());
        if migrate_only && database_url.is_none() {
            return Err(AppError::Validation(
                "DATABASE_URL is required to run migrations".to_owned(),
            ));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = match env::var("API_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            Err(_) => 3001,
        };

        let access_token_ttl_minutes = match env::var("ACCESS_TOKEN_TTL_MINUTES") {
            Ok(value) => parse_token_ttl(value.as_str())?,
            Err(_) => DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
        };

        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_owned());

        Ok(Self {
            migrate_only,
            database_url,
            api_host,
            api_port,
            access_token_ttl_minutes,
            cors_allowed_origin,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }

    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_ttl_minutes)
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_token_ttl(value: &str) -> Result<i64, AppError> {
    let minutes = value.trim().parse::<i64>().map_err(|error| {
        AppError::Validation(format!("invalid ACCESS_TOKEN_TTL_MINUTES: {error}"))
    })?;

    if minutes <= 0 {
        return Err(AppError::Validation(
            "ACCESS_TOKEN_TTL_MINUTES must be greater than zero".to_owned(),
        ));
    }

    Ok(minutes)
}
