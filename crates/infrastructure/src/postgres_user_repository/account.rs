use super::*;

impl PostgresUserRepository {
    pub(super) async fn create_impl(&self, user: NewUser) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, email, first_name, last_name, password_hash,
                      is_active, created_at, last_login_at
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.password_hash.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| account_conflict_or_internal(error, "create user"))?;

        Ok(row.into())
    }

    pub(super) async fn record_login_impl(
        &self,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = $2
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to record login: {error}")))?;

        Ok(())
    }

    pub(super) async fn update_profile_impl(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                is_active = COALESCE($5, is_active)
            WHERE id = $1
            RETURNING id, username, email, first_name, last_name, password_hash,
                      is_active, created_at, last_login_at
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .bind(update.email.as_ref().map(EmailAddress::as_str))
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| account_conflict_or_internal(error, "update user profile"))?;

        Ok(row.map(UserRecord::from))
    }

    pub(super) async fn update_password_hash_impl(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update password: {error}")))?;

        Ok(result.rows_affected() > 0)
    }
}
