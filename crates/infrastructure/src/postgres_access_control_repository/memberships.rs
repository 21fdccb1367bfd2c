use super::*;

impl PostgresAccessControlRepository {
    pub(super) async fn find_membership_impl(
        &self,
        user_id: UserId,
        scope: Scope,
    ) -> AppResult<Option<Membership>> {
        sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT user_id, scope_kind, scope_id, role_id, joined_at
            FROM memberships
            WHERE user_id = $1 AND scope_kind = $2 AND scope_id = $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(scope.kind().as_str())
        .bind(scope.id())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find membership: {error}")))?
        .map(Membership::try_from)
        .transpose()
    }

    pub(super) async fn create_membership_impl(
        &self,
        user_id: UserId,
        scope: Scope,
        role_id: RoleId,
    ) -> AppResult<Membership> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            INSERT INTO memberships (user_id, scope_kind, scope_id, role_id)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, scope_kind, scope_id, role_id, joined_at
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(scope.kind().as_str())
        .bind(scope.id())
        .bind(role_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!(
                    "user '{user_id}' already holds a role in {scope}"
                ));
            }

            AppError::Internal(format!("failed to create membership: {error}"))
        })?;

        Membership::try_from(row)
    }

    pub(super) async fn update_membership_role_impl(
        &self,
        user_id: UserId,
        scope: Scope,
        role_id: RoleId,
    ) -> AppResult<Option<Membership>> {
        sqlx::query_as::<_, MembershipRow>(
            r#"
            UPDATE memberships
            SET role_id = $4
            WHERE user_id = $1 AND scope_kind = $2 AND scope_id = $3
            RETURNING user_id, scope_kind, scope_id, role_id, joined_at
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(scope.kind().as_str())
        .bind(scope.id())
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update membership: {error}")))?
        .map(Membership::try_from)
        .transpose()
    }

    pub(super) async fn delete_membership_impl(
        &self,
        user_id: UserId,
        scope: Scope,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM memberships
            WHERE user_id = $1 AND scope_kind = $2 AND scope_id = $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(scope.kind().as_str())
        .bind(scope.id())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete membership: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    pub(super) async fn list_memberships_impl(
        &self,
        scope: Scope,
        page: PageRequest,
    ) -> AppResult<Vec<Membership>> {
        sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT user_id, scope_kind, scope_id, role_id, joined_at
            FROM memberships
            WHERE scope_kind = $1 AND scope_id = $2
            ORDER BY joined_at, user_id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(scope.kind().as_str())
        .bind(scope.id())
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list memberships: {error}")))?
        .into_iter()
        .map(Membership::try_from)
        .collect()
    }

    pub(super) async fn count_memberships_impl(&self, scope: Scope) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM memberships
            WHERE scope_kind = $1 AND scope_id = $2
            "#,
        )
        .bind(scope.kind().as_str())
        .bind(scope.id())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count memberships: {error}")))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
