use super::*;

impl PostgresAccessControlRepository {
    pub(super) async fn find_role_by_name_and_scope_impl(
        &self,
        name: &str,
        scope: Scope,
    ) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, is_system_role, scope_kind, scope_id
            FROM roles
            WHERE scope_kind = $1 AND scope_id = $2 AND name = $3
            "#,
        )
        .bind(scope.kind().as_str())
        .bind(scope.id())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?
        .map(Role::try_from)
        .transpose()
    }

    pub(super) async fn find_role_by_id_impl(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, is_system_role, scope_kind, scope_id
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?
        .map(Role::try_from)
        .transpose()
    }

    pub(super) async fn list_roles_for_scope_impl(&self, scope: Scope) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, is_system_role, scope_kind, scope_id
            FROM roles
            WHERE scope_kind = $1 AND scope_id = $2
            ORDER BY name
            "#,
        )
        .bind(scope.kind().as_str())
        .bind(scope.id())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?
        .into_iter()
        .map(Role::try_from)
        .collect()
    }

    pub(super) async fn create_role_impl(&self, role: NewRole) -> AppResult<Role> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (id, name, description, is_system_role, scope_kind, scope_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, is_system_role, scope_kind, scope_id
            "#,
        )
        .bind(RoleId::new().as_uuid())
        .bind(role.name.as_str())
        .bind(role.description.as_str())
        .bind(role.is_system_role)
        .bind(role.scope.kind().as_str())
        .bind(role.scope.id())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!(
                    "role '{}' already exists in {}",
                    role.name, role.scope
                ));
            }

            AppError::Internal(format!("failed to create role '{}': {error}", role.name))
        })?;

        Role::try_from(row)
    }
}
