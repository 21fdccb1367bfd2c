use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use taskhub_core::{AccessError, AppError, AppResult, Page, PageRequest, Scope};
use taskhub_domain::{AuditAction, Membership, Role, RoleId, UserId, UserProfile};
use tracing::info;

use crate::{AccessControlRepository, AuditEvent, AuditRepository};

mod batch;

pub use batch::{AddMemberEntry, MemberOutcome};

/// Membership composed with the member's profile and role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberResponse {
    /// Member.
    pub user_id: UserId,
    /// Organization or team of the membership.
    pub scope: Scope,
    /// Held role.
    pub role_id: RoleId,
    /// Held role name.
    pub role_name: String,
    /// Member login name.
    pub username: String,
    /// Member email address.
    pub user_email: String,
    /// Member full name.
    pub user_full_name: String,
    /// When the membership was created.
    pub joined_at: DateTime<Utc>,
}

impl MemberResponse {
    fn compose(membership: Membership, user: &UserProfile, role: &Role) -> Self {
        Self {
            user_id: membership.user_id,
            scope: membership.scope,
            role_id: role.id,
            role_name: role.name.clone(),
            username: user.username.clone(),
            user_email: user.email.clone(),
            user_full_name: user.full_name(),
            joined_at: membership.joined_at,
        }
    }
}

/// Adds, re-roles, removes and lists members of one scope.
///
/// Callers are expected to have authorized the actor already; this service
/// enforces the membership rules themselves. An actor may only grant, replace
/// or revoke a role whose permissions are a subset of its own role in the
/// same scope.
#[derive(Clone)]
pub struct MembershipService {
    repository: Arc<dyn AccessControlRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl MembershipService {
    /// Creates a new membership service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AccessControlRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            repository,
            audit_repository,
        }
    }

    /// Adds the user named by `identifier` to `scope` with the role named `role_name`.
    pub async fn add_member(
        &self,
        actor: UserId,
        scope: Scope,
        identifier: &str,
        role_name: &str,
    ) -> AppResult<MemberResponse> {
        let user = self
            .repository
            .find_user_by_identifier(identifier)
            .await?
            .ok_or_else(|| AccessError::UserNotFound(identifier.to_owned()))?;

        let already_member = AccessError::AlreadyMember {
            user_id: user.id.as_uuid(),
            scope,
        };
        if self
            .repository
            .find_membership(user.id, scope)
            .await?
            .is_some()
        {
            return Err(already_member.into());
        }

        let role = self
            .repository
            .find_role_by_name_and_scope(role_name, scope)
            .await?
            .ok_or_else(|| AccessError::RoleNotFound {
                role: role_name.to_owned(),
                scope,
            })?;
        let granted = self.actor_permissions(actor, scope).await?;
        self.ensure_grantable(&granted, role.id).await?;

        let membership = match self
            .repository
            .create_membership(user.id, scope, role.id)
            .await
        {
            Ok(membership) => membership,
            Err(AppError::Conflict(_)) => return Err(already_member.into()),
            Err(error) => return Err(error),
        };

        self.audit(
            actor,
            scope,
            AuditAction::MemberAdded,
            user.id,
            format!("added with role '{}'", role.name),
        )
        .await?;
        info!(%scope, user_id = %user.id, role = %role.name, "member added");

        Ok(MemberResponse::compose(membership, &user, &role))
    }

    /// Replaces the role of an existing member. The role must belong to `scope`.
    pub async fn update_member_role(
        &self,
        actor: UserId,
        scope: Scope,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<MemberResponse> {
        let current = self
            .repository
            .find_membership(user_id, scope)
            .await?
            .ok_or_else(|| Self::not_a_member(user_id, scope))?;

        let role = self
            .repository
            .find_role_by_id(role_id)
            .await?
            .filter(|role| role.scope == scope)
            .ok_or_else(|| AccessError::RoleNotFound {
                role: role_id.to_string(),
                scope,
            })?;
        let granted = self.actor_permissions(actor, scope).await?;
        self.ensure_grantable(&granted, current.role_id).await?;
        self.ensure_grantable(&granted, role.id).await?;

        let membership = self
            .repository
            .update_membership_role(user_id, scope, role.id)
            .await?
            .ok_or_else(|| Self::not_a_member(user_id, scope))?;
        let user = self.load_user(user_id).await?;

        self.audit(
            actor,
            scope,
            AuditAction::MemberRoleUpdated,
            user_id,
            format!("role changed to '{}'", role.name),
        )
        .await?;

        Ok(MemberResponse::compose(membership, &user, &role))
    }

    /// Removes a member from `scope`. Roles and their permissions are untouched.
    pub async fn remove_member(
        &self,
        actor: UserId,
        scope: Scope,
        user_id: UserId,
    ) -> AppResult<()> {
        let current = self
            .repository
            .find_membership(user_id, scope)
            .await?
            .ok_or_else(|| Self::not_a_member(user_id, scope))?;
        let granted = self.actor_permissions(actor, scope).await?;
        self.ensure_grantable(&granted, current.role_id).await?;

        if !self.repository.delete_membership(user_id, scope).await? {
            return Err(Self::not_a_member(user_id, scope));
        }

        self.audit(
            actor,
            scope,
            AuditAction::MemberRemoved,
            user_id,
            "removed".to_owned(),
        )
        .await?;
        info!(%scope, %user_id, "member removed");

        Ok(())
    }

    /// Lists one page of members of `scope` ordered by join time.
    pub async fn list_members(
        &self,
        scope: Scope,
        page: PageRequest,
    ) -> AppResult<Page<MemberResponse>> {
        let total = self.repository.count_memberships(scope).await?;
        let memberships = self.repository.list_memberships(scope, page).await?;

        let mut members = Vec::with_capacity(memberships.len());
        for membership in memberships {
            let user = self.load_user(membership.user_id).await?;
            let role = self
                .repository
                .find_role_by_id(membership.role_id)
                .await?
                .ok_or_else(|| {
                    AppError::Internal(format!(
                        "membership of user '{}' references missing role '{}'",
                        membership.user_id, membership.role_id
                    ))
                })?;
            members.push(MemberResponse::compose(membership, &user, &role));
        }

        Ok(Page::new(members, total, page))
    }

    /// Counts members of `scope`.
    pub async fn count_members(&self, scope: Scope) -> AppResult<u64> {
        self.repository.count_memberships(scope).await
    }

    async fn load_user(&self, user_id: UserId) -> AppResult<UserProfile> {
        self.repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("membership references missing user '{user_id}'"))
            })
    }

    async fn actor_permissions(&self, actor: UserId, scope: Scope) -> AppResult<HashSet<String>> {
        let membership = self
            .repository
            .find_membership(actor, scope)
            .await?
            .ok_or_else(|| Self::not_a_member(actor, scope))?;

        Ok(self
            .repository
            .list_role_permission_names(membership.role_id)
            .await?
            .into_iter()
            .collect())
    }

    // Names the first permission, in name order, that the actor does not hold.
    async fn ensure_grantable(&self, granted: &HashSet<String>, role_id: RoleId) -> AppResult<()> {
        let mut required = self.repository.list_role_permission_names(role_id).await?;
        required.sort();

        match required.into_iter().find(|name| !granted.contains(name)) {
            Some(excess) => Err(AccessError::Forbidden(excess).into()),
            None => Ok(()),
        }
    }

    fn not_a_member(user_id: UserId, scope: Scope) -> AppError {
        AccessError::ScopeMembershipNotFound {
            user_id: user_id.as_uuid(),
            scope,
        }
        .into()
    }

    async fn audit(
        &self,
        actor: UserId,
        scope: Scope,
        action: AuditAction,
        member: UserId,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                scope,
                actor,
                action,
                resource_type: "membership".to_owned(),
                resource_id: member.to_string(),
                detail: Some(detail),
            })
            .await
    }
}
