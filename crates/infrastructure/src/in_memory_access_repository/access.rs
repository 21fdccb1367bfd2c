use async_trait::async_trait;
use chrono::Utc;
use taskhub_application::AccessControlRepository;
use taskhub_core::{AppError, AppResult, PageRequest, Scope};
use taskhub_domain::{
    Membership, NewRole, PermissionId, PermissionRecord, Role, RoleId, RolePermission, UserId,
    UserProfile,
};
use uuid::Uuid;

use super::{InMemoryAccessRepository, StoredMembership, page_slice};

#[async_trait]
impl AccessControlRepository for InMemoryAccessRepository {
    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<PermissionRecord>> {
        let state = self.state.read().await;
        Ok(state
            .permissions
            .values()
            .find(|permission| permission.name == name)
            .cloned())
    }

    async fn create_permission(
        &self,
        name: &str,
        description: &str,
    ) -> AppResult<PermissionRecord> {
        let mut state = self.state.write().await;
        if state
            .permissions
            .values()
            .any(|permission| permission.name == name)
        {
            return Err(AppError::Conflict(format!(
                "permission '{name}' already exists"
            )));
        }

        let permission = PermissionRecord {
            id: PermissionId::new(),
            name: name.to_owned(),
            description: description.to_owned(),
        };
        state.permissions.insert(permission.id, permission.clone());
        Ok(permission)
    }

    async fn find_role_by_name_and_scope(
        &self,
        name: &str,
        scope: Scope,
    ) -> AppResult<Option<Role>> {
        let state = self.state.read().await;
        Ok(state
            .roles
            .values()
            .find(|role| role.scope == scope && role.name == name)
            .cloned())
    }

    async fn find_role_by_id(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&role_id).cloned())
    }

    async fn list_roles_for_scope(&self, scope: Scope) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state
            .roles
            .values()
            .filter(|role| role.scope == scope)
            .cloned()
            .collect();
        roles.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(roles)
    }

    async fn create_role(&self, role: NewRole) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if state
            .roles
            .values()
            .any(|existing| existing.scope == role.scope && existing.name == role.name)
        {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists in {}",
                role.name, role.scope
            )));
        }

        let created = Role {
            id: RoleId::new(),
            name: role.name,
            description: role.description,
            is_system_role: role.is_system_role,
            scope: role.scope,
        };
        state.roles.insert(created.id, created.clone());
        Ok(created)
    }

    async fn create_role_permission_link(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role_id) || !state.permissions.contains_key(&permission_id)
        {
            return Err(AppError::Internal(format!(
                "cannot link permission '{permission_id}' to missing role '{role_id}'"
            )));
        }

        state.role_permissions.insert((role_id, permission_id));
        Ok(())
    }

    async fn find_role_permission_link(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<Option<RolePermission>> {
        let state = self.state.read().await;
        Ok(state
            .role_permissions
            .contains(&(role_id, permission_id))
            .then_some(RolePermission {
                role_id,
                permission_id,
            }))
    }

    async fn list_role_permission_names(&self, role_id: RoleId) -> AppResult<Vec<String>> {
        let state = self.state.read().await;
        let mut names: Vec<String> = state
            .role_permissions
            .iter()
            .filter(|(linked_role, _)| *linked_role == role_id)
            .filter_map(|(_, permission_id)| state.permissions.get(permission_id))
            .map(|permission| permission.name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn find_membership(
        &self,
        user_id: UserId,
        scope: Scope,
    ) -> AppResult<Option<Membership>> {
        let state = self.state.read().await;
        Ok(state
            .memberships
            .get(&(user_id, scope))
            .map(|stored| stored.membership.clone()))
    }

    async fn create_membership(
        &self,
        user_id: UserId,
        scope: Scope,
        role_id: RoleId,
    ) -> AppResult<Membership> {
        let mut state = self.state.write().await;
        if state.memberships.contains_key(&(user_id, scope)) {
            return Err(AppError::Conflict(format!(
                "user '{user_id}' already holds a role in {scope}"
            )));
        }

        let membership = Membership {
            user_id,
            scope,
            role_id,
            joined_at: Utc::now(),
        };
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.memberships.insert(
            (user_id, scope),
            StoredMembership {
                sequence,
                membership: membership.clone(),
            },
        );
        Ok(membership)
    }

    async fn update_membership_role(
        &self,
        user_id: UserId,
        scope: Scope,
        role_id: RoleId,
    ) -> AppResult<Option<Membership>> {
        let mut state = self.state.write().await;
        Ok(state.memberships.get_mut(&(user_id, scope)).map(|stored| {
            stored.membership.role_id = role_id;
            stored.membership.clone()
        }))
    }

    async fn delete_membership(&self, user_id: UserId, scope: Scope) -> AppResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.memberships.remove(&(user_id, scope)).is_some())
    }

    async fn list_memberships(
        &self,
        scope: Scope,
        page: PageRequest,
    ) -> AppResult<Vec<Membership>> {
        let state = self.state.read().await;
        let mut stored: Vec<&StoredMembership> = state
            .memberships
            .values()
            .filter(|stored| stored.membership.scope == scope)
            .collect();
        stored.sort_by_key(|stored| stored.sequence);

        let memberships: Vec<Membership> = stored
            .into_iter()
            .map(|stored| stored.membership.clone())
            .collect();
        Ok(page_slice(&memberships, page))
    }

    async fn count_memberships(&self, scope: Scope) -> AppResult<u64> {
        let state = self.state.read().await;
        let count = state
            .memberships
            .keys()
            .filter(|(_, member_scope)| *member_scope == scope)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn find_user_by_identifier(&self, identifier: &str) -> AppResult<Option<UserProfile>> {
        let state = self.state.read().await;
        let by_id = Uuid::parse_str(identifier)
            .ok()
            .and_then(|id| state.users.get(&UserId::from_uuid(id)));

        Ok(by_id
            .or_else(|| {
                state
                    .users
                    .values()
                    .find(|user| user.profile.username == identifier)
            })
            .map(|user| user.profile.clone()))
    }

    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        let state = self.state.read().await;
        Ok(state.users.get(&user_id).map(|user| user.profile.clone()))
    }
}
