use super::*;

impl PostgresUserRepository {
    pub(super) async fn find_by_username_impl(
        &self,
        username: &str,
    ) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash,
                   is_active, created_at, last_login_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by username: {error}")))?;

        Ok(row.map(UserRecord::from))
    }

    pub(super) async fn find_by_id_impl(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash,
                   is_active, created_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by id: {error}")))?;

        Ok(row.map(UserRecord::from))
    }
}
