use super::*;

impl PostgresDirectoryRepository {
    pub(super) async fn create_team_impl(
        &self,
        organization_id: OrganizationId,
        draft: &TeamDraft,
        owner_id: UserId,
    ) -> AppResult<Team> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            INSERT INTO teams (id, organization_id, name, description, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organization_id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(TeamId::new().as_uuid())
        .bind(organization_id.as_uuid())
        .bind(draft.name())
        .bind(draft.description())
        .bind(owner_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| name_conflict_or_internal(error, draft.name(), "create team"))?;

        Ok(row.into())
    }

    pub(super) async fn find_team_impl(&self, team_id: TeamId) -> AppResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, organization_id, name, description, owner_id, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(team_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find team: {error}")))?;

        Ok(row.map(Team::from))
    }

    pub(super) async fn list_teams_impl(
        &self,
        organization_id: OrganizationId,
        page: PageRequest,
    ) -> AppResult<Vec<Team>> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, organization_id, name, description, owner_id, created_at, updated_at
            FROM teams
            WHERE organization_id = $1
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(organization_id.as_uuid())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list teams: {error}")))?;

        Ok(rows.into_iter().map(Team::from).collect())
    }

    pub(super) async fn count_teams_impl(&self, organization_id: OrganizationId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM teams
            WHERE organization_id = $1
            "#,
        )
        .bind(organization_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count teams: {error}")))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    pub(super) async fn update_team_impl(
        &self,
        team_id: TeamId,
        draft: &TeamDraft,
    ) -> AppResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            UPDATE teams
            SET name = $2, description = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, organization_id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(team_id.as_uuid())
        .bind(draft.name())
        .bind(draft.description())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| name_conflict_or_internal(error, draft.name(), "update team"))?;

        Ok(row.map(Team::from))
    }

    pub(super) async fn delete_team_impl(&self, team_id: TeamId) -> AppResult<bool> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start team delete transaction: {error}"))
        })?;

        sqlx::query(
            r#"
            DELETE FROM memberships
            WHERE scope_kind = 'team' AND scope_id = $1
            "#,
        )
        .bind(team_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete team memberships: {error}"))
        })?;

        sqlx::query(
            r#"
            DELETE FROM roles
            WHERE scope_kind = 'team' AND scope_id = $1
            "#,
        )
        .bind(team_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete team roles: {error}")))?;

        let result = sqlx::query(
            r#"
            DELETE FROM teams
            WHERE id = $1
            "#,
        )
        .bind(team_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete team: {error}")))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit team delete transaction: {error}"))
        })?;

        Ok(result.rows_affected() > 0)
    }
}
