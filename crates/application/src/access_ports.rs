use async_trait::async_trait;
use taskhub_core::{AppResult, PageRequest, Scope};
use taskhub_domain::{
    Membership, NewRole, PermissionId, PermissionRecord, Role, RoleId, RolePermission, UserId,
    UserProfile,
};

mod audit;

pub use audit::{AuditEvent, AuditRepository};

/// Storage port for the role/permission graph and scoped memberships.
///
/// Implementations enforce the uniqueness rules of the graph (permission
/// name, role name per scope, one membership per user and scope) and report
/// violations as `AppError::Conflict`.
#[async_trait]
pub trait AccessControlRepository: Send + Sync {
    /// Finds a catalog permission by its `resource:action` name.
    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<PermissionRecord>>;

    /// Persists a catalog permission.
    async fn create_permission(
        &self,
        name: &str,
        description: &str,
    ) -> AppResult<PermissionRecord>;

    /// Finds a role by name inside one scope.
    async fn find_role_by_name_and_scope(
        &self,
        name: &str,
        scope: Scope,
    ) -> AppResult<Option<Role>>;

    /// Finds a role by identifier.
    async fn find_role_by_id(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Lists every role of one scope ordered by name.
    async fn list_roles_for_scope(&self, scope: Scope) -> AppResult<Vec<Role>>;

    /// Persists a role.
    async fn create_role(&self, role: NewRole) -> AppResult<Role>;

    /// Links a permission to a role. Linking an existing pair is a no-op.
    async fn create_role_permission_link(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()>;

    /// Finds the link between a role and a permission.
    async fn find_role_permission_link(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<Option<RolePermission>>;

    /// Lists the permission names granted to a role, sorted.
    async fn list_role_permission_names(&self, role_id: RoleId) -> AppResult<Vec<String>>;

    /// Finds the membership of a user in a scope.
    async fn find_membership(
        &self,
        user_id: UserId,
        scope: Scope,
    ) -> AppResult<Option<Membership>>;

    /// Persists a membership.
    async fn create_membership(
        &self,
        user_id: UserId,
        scope: Scope,
        role_id: RoleId,
    ) -> AppResult<Membership>;

    /// Replaces the role of an existing membership.
    async fn update_membership_role(
        &self,
        user_id: UserId,
        scope: Scope,
        role_id: RoleId,
    ) -> AppResult<Option<Membership>>;

    /// Deletes a membership. Returns whether a row was removed.
    async fn delete_membership(&self, user_id: UserId, scope: Scope) -> AppResult<bool>;

    /// Lists one page of memberships of a scope ordered by join time.
    async fn list_memberships(&self, scope: Scope, page: PageRequest)
    -> AppResult<Vec<Membership>>;

    /// Counts memberships of a scope.
    async fn count_memberships(&self, scope: Scope) -> AppResult<u64>;

    /// Resolves a user by username, or by id when the identifier parses as a UUID.
    async fn find_user_by_identifier(&self, identifier: &str) -> AppResult<Option<UserProfile>>;

    /// Finds a user profile by identifier.
    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>>;
}
