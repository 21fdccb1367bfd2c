//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use taskhub_application::{NewUser, ProfileUpdate, UserRecord, UserRepository};
use taskhub_core::{AppError, AppResult};
use taskhub_domain::{EmailAddress, UserId, UserProfile};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            profile: UserProfile {
                id: UserId::from_uuid(row.id),
                username: row.username,
                email: row.email,
                first_name: row.first_name,
                last_name: row.last_name,
            },
            password_hash: row.password_hash,
            is_active: row.is_active,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

mod account;
mod lookup;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        self.find_by_username_impl(username).await
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        self.create_impl(user).await
    }

    async fn record_login(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<()> {
        self.record_login_impl(user_id, at).await
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> AppResult<Option<UserRecord>> {
        self.update_profile_impl(user_id, update).await
    }

    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> AppResult<bool> {
        self.update_password_hash_impl(user_id, password_hash).await
    }
}

fn account_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(
            "an account with this username or email already exists".to_owned(),
        );
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
