use super::*;

impl PostgresAccessControlRepository {
    pub(super) async fn find_user_by_identifier_impl(
        &self,
        identifier: &str,
    ) -> AppResult<Option<UserProfile>> {
        let user_id = Uuid::parse_str(identifier).ok();

        let row = sqlx::query_as::<_, UserProfileRow>(
            r#"
            SELECT id, username, email, first_name, last_name
            FROM users
            WHERE username = $1 OR id = $2
            ORDER BY (id = $2) DESC NULLS LAST
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user: {error}")))?;

        Ok(row.map(UserProfile::from))
    }

    pub(super) async fn find_user_by_id_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserProfileRow>(
            r#"
            SELECT id, username, email, first_name, last_name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user: {error}")))?;

        Ok(row.map(UserProfile::from))
    }
}
