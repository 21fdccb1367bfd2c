use super::*;

impl PostgresAccessControlRepository {
    pub(super) async fn find_permission_by_name_impl(
        &self,
        name: &str,
    ) -> AppResult<Option<PermissionRecord>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description
            FROM permissions
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?;

        Ok(row.map(PermissionRecord::from))
    }

    pub(super) async fn create_permission_impl(
        &self,
        name: &str,
        description: &str,
    ) -> AppResult<PermissionRecord> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            INSERT INTO permissions (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, description
            "#,
        )
        .bind(PermissionId::new().as_uuid())
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!("permission '{name}' already exists"));
            }

            AppError::Internal(format!("failed to create permission '{name}': {error}"))
        })?;

        Ok(row.into())
    }

    pub(super) async fn create_role_permission_link_impl(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            VALUES ($1, $2)
            ON CONFLICT (role_id, permission_id) DO NOTHING
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to link permission to role: {error}"))
        })?;

        Ok(())
    }

    pub(super) async fn find_role_permission_link_impl(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<Option<RolePermission>> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM role_permissions
                WHERE role_id = $1 AND permission_id = $2
            )
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find role permission link: {error}"))
        })?;

        Ok(exists.then_some(RolePermission {
            role_id,
            permission_id,
        }))
    }

    pub(super) async fn list_role_permission_names_impl(
        &self,
        role_id: RoleId,
    ) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT permissions.name
            FROM role_permissions
            INNER JOIN permissions
                ON permissions.id = role_permissions.permission_id
            WHERE role_permissions.role_id = $1
            ORDER BY permissions.name
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list role permissions: {error}"))
        })
    }
}
