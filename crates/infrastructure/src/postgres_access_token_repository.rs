//! PostgreSQL-backed bearer token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use taskhub_application::AccessTokenRepository;
use taskhub_core::{AppError, AppResult};
use taskhub_domain::UserId;

/// PostgreSQL implementation of the access token repository port.
#[derive(Clone)]
pub struct PostgresAccessTokenRepository {
    pool: PgPool,
}

impl PostgresAccessTokenRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessTokenRepository for PostgresAccessTokenRepository {
    async fn store_token(
        &self,
        token_hash: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO access_tokens (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token_hash)
        .bind(user_id.as_uuid())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to store access token: {error}")))?;

        Ok(())
    }

    async fn find_active_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserId>> {
        let user_id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT user_id
            FROM access_tokens
            WHERE token_hash = $1
              AND revoked_at IS NULL
              AND expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find access token: {error}")))?;

        Ok(user_id.map(UserId::from_uuid))
    }

    async fn revoke_token(&self, token_hash: &str, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE access_tokens
            SET revoked_at = $2
            WHERE token_hash = $1
              AND revoked_at IS NULL
              AND expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to revoke access token: {error}")))?;

        Ok(result.rows_affected() > 0)
    }
}
