//! PostgreSQL-backed role/permission graph and membership store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskhub_application::AccessControlRepository;
use taskhub_core::{AppError, AppResult, PageRequest, Scope};
use taskhub_domain::{
    Membership, NewRole, PermissionId, PermissionRecord, Role, RoleId, RolePermission, UserId,
    UserProfile,
};

mod memberships;
mod permissions;
mod roles;
mod users;

/// PostgreSQL implementation of the access-control storage port.
#[derive(Clone)]
pub struct PostgresAccessControlRepository {
    pool: PgPool,
}

impl PostgresAccessControlRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PermissionRow {
    id: Uuid,
    name: String,
    description: String,
}

impl From<PermissionRow> for PermissionRecord {
    fn from(row: PermissionRow) -> Self {
        Self {
            id: PermissionId::from_uuid(row.id),
            name: row.name,
            description: row.description,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    description: String,
    is_system_role: bool,
    scope_kind: String,
    scope_id: Uuid,
}

impl TryFrom<RoleRow> for Role {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RoleId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            is_system_role: row.is_system_role,
            scope: Scope::new(row.scope_kind.parse()?, row.scope_id),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    user_id: Uuid,
    scope_kind: String,
    scope_id: Uuid,
    role_id: Uuid,
    joined_at: DateTime<Utc>,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = AppError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::from_uuid(row.user_id),
            scope: Scope::new(row.scope_kind.parse()?, row.scope_id),
            role_id: RoleId::from_uuid(row.role_id),
            joined_at: row.joined_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserProfileRow {
    id: Uuid,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
}

impl From<UserProfileRow> for UserProfile {
    fn from(row: UserProfileRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(database_error) if database_error.code().as_deref() == Some("23505")
    )
}

#[async_trait]
impl AccessControlRepository for PostgresAccessControlRepository {
    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<PermissionRecord>> {
        self.find_permission_by_name_impl(name).await
    }

    async fn create_permission(
        &self,
        name: &str,
        description: &str,
    ) -> AppResult<PermissionRecord> {
        self.create_permission_impl(name, description).await
    }

    async fn find_role_by_name_and_scope(
        &self,
        name: &str,
        scope: Scope,
    ) -> AppResult<Option<Role>> {
        self.find_role_by_name_and_scope_impl(name, scope).await
    }

    async fn find_role_by_id(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        self.find_role_by_id_impl(role_id).await
    }

    async fn list_roles_for_scope(&self, scope: Scope) -> AppResult<Vec<Role>> {
        self.list_roles_for_scope_impl(scope).await
    }

    async fn create_role(&self, role: NewRole) -> AppResult<Role> {
        self.create_role_impl(role).await
    }

    async fn create_role_permission_link(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.create_role_permission_link_impl(role_id, permission_id)
            .await
    }

    async fn find_role_permission_link(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<Option<RolePermission>> {
        self.find_role_permission_link_impl(role_id, permission_id)
            .await
    }

    async fn list_role_permission_names(&self, role_id: RoleId) -> AppResult<Vec<String>> {
        self.list_role_permission_names_impl(role_id).await
    }

    async fn find_membership(
        &self,
        user_id: UserId,
        scope: Scope,
    ) -> AppResult<Option<Membership>> {
        self.find_membership_impl(user_id, scope).await
    }

    async fn create_membership(
        &self,
        user_id: UserId,
        scope: Scope,
        role_id: RoleId,
    ) -> AppResult<Membership> {
        self.create_membership_impl(user_id, scope, role_id).await
    }

    async fn update_membership_role(
        &self,
        user_id: UserId,
        scope: Scope,
        role_id: RoleId,
    ) -> AppResult<Option<Membership>> {
        self.update_membership_role_impl(user_id, scope, role_id)
            .await
    }

    async fn delete_membership(&self, user_id: UserId, scope: Scope) -> AppResult<bool> {
        self.delete_membership_impl(user_id, scope).await
    }

    async fn list_memberships(
        &self,
        scope: Scope,
        page: PageRequest,
    ) -> AppResult<Vec<Membership>> {
        self.list_memberships_impl(scope, page).await
    }

    async fn count_memberships(&self, scope: Scope) -> AppResult<u64> {
        self.count_memberships_impl(scope).await
    }

    async fn find_user_by_identifier(&self, identifier: &str) -> AppResult<Option<UserProfile>> {
        self.find_user_by_identifier_impl(identifier).await
    }

    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        self.find_user_by_id_impl(user_id).await
    }
}

#[cfg(test)]
mod tests;
