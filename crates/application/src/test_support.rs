use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use taskhub_core::{AppError, AppResult, PageRequest, Scope, ScopeKind};
use taskhub_domain::{
    Membership, NewRole, Organization, OrganizationDraft, OrganizationId, PermissionId,
    PermissionRecord, Role, RoleId, RolePermission, RoleTemplate, RoleTemplateRegistry, Team,
    TeamDraft, TeamId, UserId, UserProfile,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    AccessControlRepository, AccessTokenRepository, AuditEvent, AuditRepository,
    AuthorizationService, MembershipService, NewUser, OrganizationRepository,
    OrganizationService, PasswordHasher, ProfileUpdate, RoleBootstrapService, TeamRepository,
    TeamService, UserRecord, UserRepository,
};

pub(crate) fn standard_registry() -> Arc<RoleTemplateRegistry> {
    Arc::new(
        RoleTemplateRegistry::standard()
            .unwrap_or_else(|error| panic!("standard registry should validate: {error}")),
    )
}

/// Registry whose owner templates grant a permission missing from the catalog,
/// so every scope bootstrap fails with `PermissionNotFound("billing:refund")`.
pub(crate) fn registry_with_unknown_permission() -> Arc<RoleTemplateRegistry> {
    let owner = |kind: &str| {
        RoleTemplate::new("owner", format!("{kind} Owner"), "", ["team:read", "billing:refund"])
            .unwrap_or_else(|error| panic!("{error}"))
    };
    Arc::new(
        RoleTemplateRegistry::new(vec![owner("Org")], vec![owner("Team")])
            .unwrap_or_else(|error| panic!("{error}")),
    )
}

pub(crate) fn organization_service(store: &Arc<FakeStore>) -> OrganizationService {
    organization_service_with(store, standard_registry())
}

pub(crate) fn organization_service_with(
    store: &Arc<FakeStore>,
    registry: Arc<RoleTemplateRegistry>,
) -> OrganizationService {
    OrganizationService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        AuthorizationService::new(store.clone()),
        RoleBootstrapService::new(store.clone(), registry),
        MembershipService::new(store.clone(), store.clone()),
    )
}

pub(crate) fn team_service(store: &Arc<FakeStore>) -> TeamService {
    team_service_with(store, standard_registry())
}

pub(crate) fn team_service_with(
    store: &Arc<FakeStore>,
    registry: Arc<RoleTemplateRegistry>,
) -> TeamService {
    TeamService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        AuthorizationService::new(store.clone()),
        RoleBootstrapService::new(store.clone(), registry),
        MembershipService::new(store.clone(), store.clone()),
    )
}

#[derive(Default)]
struct FakeState {
    permissions: Vec<PermissionRecord>,
    roles: Vec<Role>,
    links: HashSet<RolePermission>,
    memberships: HashMap<(UserId, Scope), Membership>,
    users: Vec<UserRecord>,
    organizations: HashMap<OrganizationId, Organization>,
    teams: HashMap<TeamId, Team>,
    events: Vec<AuditEvent>,
    tokens: HashMap<String, FakeToken>,
    racing_permissions: HashSet<String>,
    racing_membership_inserts: usize,
}

struct FakeToken {
    user_id: UserId,
    expires_at: DateTime<Utc>,
    revoked: bool,
}

/// Single in-memory fake backing every port the services use.
#[derive(Default)]
pub(crate) struct FakeStore {
    state: Mutex<FakeState>,
}

impl FakeStore {
    pub(crate) async fn add_user(&self, username: &str) -> UserProfile {
        let profile = UserProfile {
            id: UserId::new(),
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            first_name: format!("{username}-first"),
            last_name: format!("{username}-last"),
        };
        self.state.lock().await.users.push(UserRecord {
            profile: profile.clone(),
            password_hash: "hashed:correct-horse-battery".to_owned(),
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        });
        profile
    }

    pub(crate) async fn deactivate_user(&self, user_id: UserId) {
        let mut state = self.state.lock().await;
        if let Some(user) = state
            .users
            .iter_mut()
            .find(|user| user.profile.id == user_id)
        {
            user.is_active = false;
        }
    }

    pub(crate) async fn events(&self) -> Vec<AuditEvent> {
        self.state.lock().await.events.clone()
    }

    pub(crate) async fn permission_count(&self) -> usize {
        self.state.lock().await.permissions.len()
    }

    pub(crate) async fn link_count(&self) -> usize {
        self.state.lock().await.links.len()
    }

    pub(crate) async fn roles_in(&self, scope: Scope) -> Vec<Role> {
        self.state
            .lock()
            .await
            .roles
            .iter()
            .filter(|role| role.scope == scope)
            .cloned()
            .collect()
    }

    /// Makes the next creation of `name` fail as if another writer won the race.
    pub(crate) async fn race_permission_creation(&self, name: &str) {
        self.state
            .lock()
            .await
            .racing_permissions
            .insert(name.to_owned());
    }

    /// Makes the next membership insert report a unique violation.
    pub(crate) async fn organization_and_team_counts(&self) -> (usize, usize) {
        let state = self.state.lock().await;
        (state.organizations.len(), state.teams.len())
    }

    pub(crate) async fn race_next_membership_insert(&self) {
        self.state.lock().await.racing_membership_inserts += 1;
    }

    pub(crate) async fn remove_permission_link(&self, role_id: RoleId, permission_name: &str) {
        let mut state = self.state.lock().await;
        let Some(permission_id) = state
            .permissions
            .iter()
            .find(|permission| permission.name == permission_name)
            .map(|permission| permission.id)
        else {
            return;
        };
        state.links.remove(&RolePermission {
            role_id,
            permission_id,
        });
    }
}

fn page_slice<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

#[async_trait]
impl AccessControlRepository for FakeStore {
    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<PermissionRecord>> {
        Ok(self
            .state
            .lock()
            .await
            .permissions
            .iter()
            .find(|permission| permission.name == name)
            .cloned())
    }

    async fn create_permission(
        &self,
        name: &str,
        description: &str,
    ) -> AppResult<PermissionRecord> {
        let mut state = self.state.lock().await;
        let record = PermissionRecord {
            id: PermissionId::new(),
            name: name.to_owned(),
            description: description.to_owned(),
        };

        if state.racing_permissions.remove(name) {
            state.permissions.push(record);
            return Err(AppError::Conflict(format!(
                "permission '{name}' already exists"
            )));
        }

        if state
            .permissions
            .iter()
            .any(|permission| permission.name == name)
        {
            return Err(AppError::Conflict(format!(
                "permission '{name}' already exists"
            )));
        }

        state.permissions.push(record.clone());
        Ok(record)
    }

    async fn find_role_by_name_and_scope(
        &self,
        name: &str,
        scope: Scope,
    ) -> AppResult<Option<Role>> {
        Ok(self
            .state
            .lock()
            .await
            .roles
            .iter()
            .find(|role| role.name == name && role.scope == scope)
            .cloned())
    }

    async fn find_role_by_id(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .state
            .lock()
            .await
            .roles
            .iter()
            .find(|role| role.id == role_id)
            .cloned())
    }

    async fn list_roles_for_scope(&self, scope: Scope) -> AppResult<Vec<Role>> {
        let mut roles = self.roles_in(scope).await;
        roles.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(roles)
    }

    async fn create_role(&self, role: NewRole) -> AppResult<Role> {
        let mut state = self.state.lock().await;
        if state
            .roles
            .iter()
            .any(|existing| existing.name == role.name && existing.scope == role.scope)
        {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.name
            )));
        }

        let role = Role {
            id: RoleId::new(),
            name: role.name,
            description: role.description,
            is_system_role: role.is_system_role,
            scope: role.scope,
        };
        state.roles.push(role.clone());
        Ok(role)
    }

    async fn create_role_permission_link(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.state.lock().await.links.insert(RolePermission {
            role_id,
            permission_id,
        });
        Ok(())
    }

    async fn find_role_permission_link(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<Option<RolePermission>> {
        let link = RolePermission {
            role_id,
            permission_id,
        };
        Ok(self.state.lock().await.links.get(&link).copied())
    }

    async fn list_role_permission_names(&self, role_id: RoleId) -> AppResult<Vec<String>> {
        let state = self.state.lock().await;
        let mut names: Vec<String> = state
            .links
            .iter()
            .filter(|link| link.role_id == role_id)
            .filter_map(|link| {
                state
                    .permissions
                    .iter()
                    .find(|permission| permission.id == link.permission_id)
                    .map(|permission| permission.name.clone())
            })
            .collect();
        names.sort();
        Ok(names)
    }

    async fn find_membership(
        &self,
        user_id: UserId,
        scope: Scope,
    ) -> AppResult<Option<Membership>> {
        Ok(self
            .state
            .lock()
            .await
            .memberships
            .get(&(user_id, scope))
            .cloned())
    }

    async fn create_membership(
        &self,
        user_id: UserId,
        scope: Scope,
        role_id: RoleId,
    ) -> AppResult<Membership> {
        let mut state = self.state.lock().await;
        if state.racing_membership_inserts > 0 {
            state.racing_membership_inserts -= 1;
            return Err(AppError::Conflict("membership already exists".to_owned()));
        }

        if state.memberships.contains_key(&(user_id, scope)) {
            return Err(AppError::Conflict("membership already exists".to_owned()));
        }

        let membership = Membership {
            user_id,
            scope,
            role_id,
            joined_at: Utc::now(),
        };
        state
            .memberships
            .insert((user_id, scope), membership.clone());
        Ok(membership)
    }

    async fn update_membership_role(
        &self,
        user_id: UserId,
        scope: Scope,
        role_id: RoleId,
    ) -> AppResult<Option<Membership>> {
        let mut state = self.state.lock().await;
        Ok(state.memberships.get_mut(&(user_id, scope)).map(|membership| {
            membership.role_id = role_id;
            membership.clone()
        }))
    }

    async fn delete_membership(&self, user_id: UserId, scope: Scope) -> AppResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .memberships
            .remove(&(user_id, scope))
            .is_some())
    }

    async fn list_memberships(
        &self,
        scope: Scope,
        page: PageRequest,
    ) -> AppResult<Vec<Membership>> {
        let state = self.state.lock().await;
        let mut memberships: Vec<Membership> = state
            .memberships
            .values()
            .filter(|membership| membership.scope == scope)
            .cloned()
            .collect();
        memberships.sort_by_key(|membership| (membership.joined_at, membership.user_id));
        Ok(page_slice(&memberships, page))
    }

    async fn count_memberships(&self, scope: Scope) -> AppResult<u64> {
        let state = self.state.lock().await;
        Ok(state
            .memberships
            .values()
            .filter(|membership| membership.scope == scope)
            .count() as u64)
    }

    async fn find_user_by_identifier(&self, identifier: &str) -> AppResult<Option<UserProfile>> {
        let state = self.state.lock().await;
        let by_id = Uuid::parse_str(identifier).ok().map(UserId::from_uuid);
        Ok(state
            .users
            .iter()
            .find(|user| user.profile.username == identifier || Some(user.profile.id) == by_id)
            .map(|user| user.profile.clone()))
    }

    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .iter()
            .find(|user| user.profile.id == user_id)
            .map(|user| user.profile.clone()))
    }
}

#[async_trait]
impl AuditRepository for FakeStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.state.lock().await.events.push(event);
        Ok(())
    }
}

#[async_trait]
impl OrganizationRepository for FakeStore {
    async fn create_organization(
        &self,
        draft: &OrganizationDraft,
        owner_id: UserId,
    ) -> AppResult<Organization> {
        let mut state = self.state.lock().await;
        if state
            .organizations
            .values()
            .any(|organization| organization.name == draft.name())
        {
            return Err(AppError::Conflict(format!(
                "organization '{}' already exists",
                draft.name()
            )));
        }

        let now = Utc::now();
        let organization = Organization {
            id: OrganizationId::new(),
            name: draft.name().to_owned(),
            description: draft.description().map(str::to_owned),
            owner_id,
            created_at: now,
            updated_at: now,
        };
        state
            .organizations
            .insert(organization.id, organization.clone());
        Ok(organization)
    }

    async fn find_organization(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        Ok(self
            .state
            .lock()
            .await
            .organizations
            .get(&organization_id)
            .cloned())
    }

    async fn list_organizations_for_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> AppResult<Vec<Organization>> {
        let state = self.state.lock().await;
        let mut organizations: Vec<Organization> = state
            .organizations
            .values()
            .filter(|organization| {
                state
                    .memberships
                    .contains_key(&(user_id, organization.scope()))
            })
            .cloned()
            .collect();
        organizations.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(page_slice(&organizations, page))
    }

    async fn count_organizations_for_user(&self, user_id: UserId) -> AppResult<u64> {
        let state = self.state.lock().await;
        Ok(state
            .memberships
            .keys()
            .filter(|(member, scope)| {
                *member == user_id && scope.kind() == ScopeKind::Organization
            })
            .count() as u64)
    }

    async fn update_organization(
        &self,
        organization_id: OrganizationId,
        draft: &OrganizationDraft,
    ) -> AppResult<Option<Organization>> {
        let mut state = self.state.lock().await;
        if state.organizations.values().any(|organization| {
            organization.id != organization_id && organization.name == draft.name()
        }) {
            return Err(AppError::Conflict(format!(
                "organization '{}' already exists",
                draft.name()
            )));
        }

        Ok(state
            .organizations
            .get_mut(&organization_id)
            .map(|organization| {
                organization.name = draft.name().to_owned();
                organization.description = draft.description().map(str::to_owned);
                organization.updated_at = Utc::now();
                organization.clone()
            }))
    }

    async fn delete_organization(&self, organization_id: OrganizationId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        if state.organizations.remove(&organization_id).is_none() {
            return Ok(false);
        }

        let mut scopes = vec![Scope::from(organization_id)];
        state.teams.retain(|team_id, team| {
            let keep = team.organization_id != organization_id;
            if !keep {
                scopes.push(Scope::from(*team_id));
            }
            keep
        });
        state
            .memberships
            .retain(|(_, scope), _| !scopes.contains(scope));
        let removed_roles: HashSet<RoleId> = state
            .roles
            .iter()
            .filter(|role| scopes.contains(&role.scope))
            .map(|role| role.id)
            .collect();
        state.roles.retain(|role| !removed_roles.contains(&role.id));
        state
            .links
            .retain(|link| !removed_roles.contains(&link.role_id));
        Ok(true)
    }
}

#[async_trait]
impl TeamRepository for FakeStore {
    async fn create_team(
        &self,
        organization_id: OrganizationId,
        draft: &TeamDraft,
        owner_id: UserId,
    ) -> AppResult<Team> {
        let mut state = self.state.lock().await;
        if state
            .teams
            .values()
            .any(|team| team.organization_id == organization_id && team.name == draft.name())
        {
            return Err(AppError::Conflict(format!(
                "team '{}' already exists",
                draft.name()
            )));
        }

        let now = Utc::now();
        let team = Team {
            id: TeamId::new(),
            name: draft.name().to_owned(),
            description: draft.description().map(str::to_owned),
            organization_id,
            owner_id,
            created_at: now,
            updated_at: now,
        };
        state.teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn find_team(&self, team_id: TeamId) -> AppResult<Option<Team>> {
        Ok(self.state.lock().await.teams.get(&team_id).cloned())
    }

    async fn list_teams(
        &self,
        organization_id: OrganizationId,
        page: PageRequest,
    ) -> AppResult<Vec<Team>> {
        let state = self.state.lock().await;
        let mut teams: Vec<Team> = state
            .teams
            .values()
            .filter(|team| team.organization_id == organization_id)
            .cloned()
            .collect();
        teams.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(page_slice(&teams, page))
    }

    async fn count_teams(&self, organization_id: OrganizationId) -> AppResult<u64> {
        let state = self.state.lock().await;
        Ok(state
            .teams
            .values()
            .filter(|team| team.organization_id == organization_id)
            .count() as u64)
    }

    async fn update_team(&self, team_id: TeamId, draft: &TeamDraft) -> AppResult<Option<Team>> {
        let mut state = self.state.lock().await;
        let Some(organization_id) = state.teams.get(&team_id).map(|team| team.organization_id)
        else {
            return Ok(None);
        };

        if state.teams.values().any(|team| {
            team.id != team_id
                && team.organization_id == organization_id
                && team.name == draft.name()
        }) {
            return Err(AppError::Conflict(format!(
                "team '{}' already exists",
                draft.name()
            )));
        }

        Ok(state.teams.get_mut(&team_id).map(|team| {
            team.name = draft.name().to_owned();
            team.description = draft.description().map(str::to_owned);
            team.updated_at = Utc::now();
            team.clone()
        }))
    }

    async fn delete_team(&self, team_id: TeamId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        if state.teams.remove(&team_id).is_none() {
            return Ok(false);
        }

        let scope = Scope::from(team_id);
        state
            .memberships
            .retain(|(_, membership_scope), _| *membership_scope != scope);
        let removed_roles: HashSet<RoleId> = state
            .roles
            .iter()
            .filter(|role| role.scope == scope)
            .map(|role| role.id)
            .collect();
        state.roles.retain(|role| !removed_roles.contains(&role.id));
        state
            .links
            .retain(|link| !removed_roles.contains(&link.role_id));
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for FakeStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .iter()
            .find(|user| user.profile.username == username)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .iter()
            .find(|user| user.profile.id == user_id)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|existing| {
            existing.profile.username == user.username.as_str()
                || existing.profile.email == user.email.as_str()
        }) {
            return Err(AppError::Conflict(
                "username or email is already registered".to_owned(),
            ));
        }

        let record = UserRecord {
            profile: UserProfile {
                id: UserId::new(),
                username: user.username.into(),
                email: user.email.into(),
                first_name: user.first_name,
                last_name: user.last_name,
            },
            password_hash: user.password_hash,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        };
        state.users.push(record.clone());
        Ok(record)
    }

    async fn record_login(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state
            .users
            .iter_mut()
            .find(|user| user.profile.id == user_id)
        {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> AppResult<Option<UserRecord>> {
        let mut state = self.state.lock().await;
        let email_taken = update.email.as_ref().is_some_and(|email| {
            state
                .users
                .iter()
                .any(|user| user.profile.id != user_id && user.profile.email == email.as_str())
        });
        if email_taken {
            return Err(AppError::Conflict("email is already registered".to_owned()));
        }

        let Some(user) = state.users.iter_mut().find(|user| user.profile.id == user_id) else {
            return Ok(None);
        };
        if let Some(first_name) = &update.first_name {
            user.profile.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &update.last_name {
            user.profile.last_name.clone_from(last_name);
        }
        if let Some(email) = &update.email {
            user.profile.email = email.as_str().to_owned();
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        Ok(Some(user.clone()))
    }

    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let Some(user) = state.users.iter_mut().find(|user| user.profile.id == user_id) else {
            return Ok(false);
        };
        user.password_hash = password_hash.to_owned();
        Ok(true)
    }
}

#[async_trait]
impl AccessTokenRepository for FakeStore {
    async fn store_token(
        &self,
        token_hash: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.state.lock().await.tokens.insert(
            token_hash.to_owned(),
            FakeToken {
                user_id,
                expires_at,
                revoked: false,
            },
        );
        Ok(())
    }

    async fn find_active_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserId>> {
        Ok(self
            .state
            .lock()
            .await
            .tokens
            .get(token_hash)
            .filter(|token| !token.revoked && token.expires_at > now)
            .map(|token| token.user_id))
    }

    async fn revoke_token(&self, token_hash: &str, _at: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        Ok(match state.tokens.get_mut(token_hash) {
            Some(token) if !token.revoked => {
                token.revoked = true;
                true
            }
            _ => false,
        })
    }
}

/// Reversible stand-in for Argon2 so tests stay fast.
pub(crate) struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash.strip_prefix("hashed:") == Some(password))
    }
}
