use super::*;

impl PostgresDirectoryRepository {
    pub(super) async fn create_organization_impl(
        &self,
        draft: &OrganizationDraft,
        owner_id: UserId,
    ) -> AppResult<Organization> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            INSERT INTO organizations (id, name, description, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(OrganizationId::new().as_uuid())
        .bind(draft.name())
        .bind(draft.description())
        .bind(owner_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| name_conflict_or_internal(error, draft.name(), "create organization"))?;

        Ok(row.into())
    }

    pub(super) async fn find_organization_impl(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(organization_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find organization: {error}")))?;

        Ok(row.map(Organization::from))
    }

    pub(super) async fn list_organizations_for_user_impl(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> AppResult<Vec<Organization>> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT organizations.id, organizations.name, organizations.description,
                   organizations.owner_id, organizations.created_at, organizations.updated_at
            FROM organizations
            INNER JOIN memberships
                ON memberships.scope_kind = 'organization'
               AND memberships.scope_id = organizations.id
            WHERE memberships.user_id = $1
            ORDER BY organizations.name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list organizations: {error}")))?;

        Ok(rows.into_iter().map(Organization::from).collect())
    }

    pub(super) async fn count_organizations_for_user_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM memberships
            INNER JOIN organizations
                ON organizations.id = memberships.scope_id
            WHERE memberships.user_id = $1
              AND memberships.scope_kind = 'organization'
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count organizations: {error}")))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    pub(super) async fn update_organization_impl(
        &self,
        organization_id: OrganizationId,
        draft: &OrganizationDraft,
    ) -> AppResult<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            UPDATE organizations
            SET name = $2, description = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(organization_id.as_uuid())
        .bind(draft.name())
        .bind(draft.description())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| name_conflict_or_internal(error, draft.name(), "update organization"))?;

        Ok(row.map(Organization::from))
    }

    pub(super) async fn delete_organization_impl(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<bool> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start organization delete transaction: {error}"
            ))
        })?;

        // Role links and memberships cascade from roles; teams cascade from
        // the organization row.
        sqlx::query(
            r#"
            DELETE FROM memberships
            WHERE (scope_kind = 'organization' AND scope_id = $1)
               OR (scope_kind = 'team' AND scope_id IN (
                    SELECT id FROM teams WHERE organization_id = $1
               ))
            "#,
        )
        .bind(organization_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete organization memberships: {error}"))
        })?;

        sqlx::query(
            r#"
            DELETE FROM roles
            WHERE (scope_kind = 'organization' AND scope_id = $1)
               OR (scope_kind = 'team' AND scope_id IN (
                    SELECT id FROM teams WHERE organization_id = $1
               ))
            "#,
        )
        .bind(organization_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete organization roles: {error}"))
        })?;

        let result = sqlx::query(
            r#"
            DELETE FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(organization_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete organization: {error}")))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit organization delete transaction: {error}"
            ))
        })?;

        Ok(result.rows_affected() > 0)
    }
}
