//! Role/permission graph entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskhub_core::Scope;

use crate::{PermissionId, RoleId, UserId};

/// Catalog permission as persisted in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionRecord {
    /// Storage identifier.
    pub id: PermissionId,
    /// Globally unique `resource:action` name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
}

/// Named bundle of permissions bound to exactly one organization or team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    /// Storage identifier.
    pub id: RoleId,
    /// Role name, unique within its scope.
    pub name: String,
    /// Optional description.
    pub description: String,
    /// True for roles materialized from templates.
    pub is_system_role: bool,
    /// Organization or team the role belongs to. Never changes.
    pub scope: Scope,
}

/// Input for role creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Role name, unique within its scope.
    pub name: String,
    /// Optional description.
    pub description: String,
    /// True for roles materialized from templates.
    pub is_system_role: bool,
    /// Organization or team the role belongs to.
    pub scope: Scope,
}

/// Link granting one permission to one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RolePermission {
    /// Role holding the permission.
    pub role_id: RoleId,
    /// Granted permission.
    pub permission_id: PermissionId,
}

/// One user's single role inside one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Membership {
    /// Member.
    pub user_id: UserId,
    /// Organization or team of the membership.
    pub scope: Scope,
    /// Role held in that scope.
    pub role_id: RoleId,
    /// When the membership was created.
    pub joined_at: DateTime<Utc>,
}

/// Stable audit actions emitted by membership and directory use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Default roles were materialized for a scope.
    RolesBootstrapped,
    /// An organization was created.
    OrganizationCreated,
    /// Organization settings were updated.
    OrganizationUpdated,
    /// An organization was deleted.
    OrganizationDeleted,
    /// A team was created.
    TeamCreated,
    /// Team details were updated.
    TeamUpdated,
    /// A team was deleted.
    TeamDeleted,
    /// A member was added to a scope.
    MemberAdded,
    /// A member's role was changed.
    MemberRoleUpdated,
    /// A member was removed from a scope.
    MemberRemoved,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RolesBootstrapped => "access.roles.bootstrapped",
            Self::OrganizationCreated => "directory.organization.created",
            Self::OrganizationUpdated => "directory.organization.updated",
            Self::OrganizationDeleted => "directory.organization.deleted",
            Self::TeamCreated => "directory.team.created",
            Self::TeamUpdated => "directory.team.updated",
            Self::TeamDeleted => "directory.team.deleted",
            Self::MemberAdded => "access.member.added",
            Self::MemberRoleUpdated => "access.member.role_updated",
            Self::MemberRemoved => "access.member.removed",
        }
    }
}
