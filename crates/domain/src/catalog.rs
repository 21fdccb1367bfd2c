//! Permission catalog.
//!
//! The catalog is the fixed vocabulary of `resource:action` names that role
//! templates reference and that the authorization evaluator checks. It is
//! materialized into storage by the bootstrap service; nothing else creates
//! permission rows.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use taskhub_core::AppError;

/// Resource group a permission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionGroup {
    /// Organization settings, members and billing.
    Organization,
    /// Teams inside an organization.
    Team,
    /// Projects owned by teams.
    Project,
    /// Tasks inside projects.
    Task,
    /// Analytics dashboards and exports.
    Report,
}

impl PermissionGroup {
    /// Returns the stable group name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Team => "team",
            Self::Project => "project",
            Self::Task => "task",
            Self::Report => "report",
        }
    }
}

/// Permissions known to the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    /// View the organization's name, description and settings.
    OrganizationReadDetails,
    /// Update the organization's name, description and settings.
    OrganizationUpdateSettings,
    /// Delete the organization.
    OrganizationDelete,
    /// Add, remove and view organization members.
    OrganizationManageMembers,
    /// Assign roles to members.
    OrganizationManageRoles,
    /// Create custom roles.
    OrganizationCreateCustomRoles,
    /// Edit and delete custom roles.
    OrganizationManageCustomRoles,
    /// View the organization's audit log.
    OrganizationViewAuditLog,
    /// Manage billing and subscription.
    OrganizationManageBilling,
    /// Create teams in the organization.
    TeamCreate,
    /// View teams.
    TeamRead,
    /// Update a team's name and description.
    TeamUpdate,
    /// Delete a team.
    TeamDelete,
    /// Add or remove team members.
    TeamManageMembers,
    /// Create projects.
    ProjectCreate,
    /// View projects.
    ProjectRead,
    /// Update project details.
    ProjectUpdate,
    /// Delete a project.
    ProjectDelete,
    /// Add or remove project members.
    ProjectManageMembers,
    /// Change a project's status.
    ProjectChangeStatus,
    /// Create tasks.
    TaskCreate,
    /// View tasks.
    TaskRead,
    /// Update task details.
    TaskUpdate,
    /// Delete a task.
    TaskDelete,
    /// Assign or unassign users to a task.
    TaskAssignUser,
    /// Change a task's status.
    TaskChangeStatus,
    /// Comment on tasks.
    TaskComment,
    /// Add or delete task attachments.
    TaskManageAttachments,
    /// View analytics dashboards.
    ReportsView,
    /// Export reports.
    ReportsExport,
}

const ALL: &[Permission] = &[
    Permission::OrganizationReadDetails,
    Permission::OrganizationUpdateSettings,
    Permission::OrganizationDelete,
    Permission::OrganizationManageMembers,
    Permission::OrganizationManageRoles,
    Permission::OrganizationCreateCustomRoles,
    Permission::OrganizationManageCustomRoles,
    Permission::OrganizationViewAuditLog,
    Permission::OrganizationManageBilling,
    Permission::TeamCreate,
    Permission::TeamRead,
    Permission::TeamUpdate,
    Permission::TeamDelete,
    Permission::TeamManageMembers,
    Permission::ProjectCreate,
    Permission::ProjectRead,
    Permission::ProjectUpdate,
    Permission::ProjectDelete,
    Permission::ProjectManageMembers,
    Permission::ProjectChangeStatus,
    Permission::TaskCreate,
    Permission::TaskRead,
    Permission::TaskUpdate,
    Permission::TaskDelete,
    Permission::TaskAssignUser,
    Permission::TaskChangeStatus,
    Permission::TaskComment,
    Permission::TaskManageAttachments,
    Permission::ReportsView,
    Permission::ReportsExport,
];

impl Permission {
    /// Returns the stable storage name for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrganizationReadDetails => "organization:read_details",
            Self::OrganizationUpdateSettings => "organization:update_settings",
            Self::OrganizationDelete => "organization:delete",
            Self::OrganizationManageMembers => "organization:manage_members",
            Self::OrganizationManageRoles => "organization:manage_roles",
            Self::OrganizationCreateCustomRoles => "organization:create_custom_roles",
            Self::OrganizationManageCustomRoles => "organization:manage_custom_roles",
            Self::OrganizationViewAuditLog => "organization:view_audit_log",
            Self::OrganizationManageBilling => "organization:manage_billing",
            Self::TeamCreate => "team:create",
            Self::TeamRead => "team:read",
            Self::TeamUpdate => "team:update",
            Self::TeamDelete => "team:delete",
            Self::TeamManageMembers => "team:manage_members",
            Self::ProjectCreate => "project:create",
            Self::ProjectRead => "project:read",
            Self::ProjectUpdate => "project:update",
            Self::ProjectDelete => "project:delete",
            Self::ProjectManageMembers => "project:manage_members",
            Self::ProjectChangeStatus => "project:change_status",
            Self::TaskCreate => "task:create",
            Self::TaskRead => "task:read",
            Self::TaskUpdate => "task:update",
            Self::TaskDelete => "task:delete",
            Self::TaskAssignUser => "task:assign_user",
            Self::TaskChangeStatus => "task:change_status",
            Self::TaskComment => "task:comment",
            Self::TaskManageAttachments => "task:manage_attachments",
            Self::ReportsView => "reports:view",
            Self::ReportsExport => "reports:export",
        }
    }

    /// Returns the human-readable description stored with the permission.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::OrganizationReadDetails => {
                "View the organization's name, description, and settings."
            }
            Self::OrganizationUpdateSettings => {
                "Update the organization's name, description, and settings."
            }
            Self::OrganizationDelete => "Delete the entire organization.",
            Self::OrganizationManageMembers => {
                "Invite, remove, and view members of the organization."
            }
            Self::OrganizationManageRoles => "Assign roles to members.",
            Self::OrganizationCreateCustomRoles => {
                "Create new custom roles within the organization."
            }
            Self::OrganizationManageCustomRoles => {
                "Edit and delete custom roles within the organization."
            }
            Self::OrganizationViewAuditLog => "View the organization's audit log.",
            Self::OrganizationManageBilling => {
                "View and manage billing information and subscription."
            }
            Self::TeamCreate => "Create new teams within the organization.",
            Self::TeamRead => "View teams and their basic details.",
            Self::TeamUpdate => "Update a team's name and description.",
            Self::TeamDelete => "Delete a team.",
            Self::TeamManageMembers => "Add or remove members from a team.",
            Self::ProjectCreate => "Create new projects.",
            Self::ProjectRead => "View project details, tasks, and members.",
            Self::ProjectUpdate => "Update project details (name, description, due dates).",
            Self::ProjectDelete => "Delete a project.",
            Self::ProjectManageMembers => "Add or remove members from a project.",
            Self::ProjectChangeStatus => "Change the status of a project.",
            Self::TaskCreate => "Create new tasks within a project.",
            Self::TaskRead => "View task details, comments, and attachments.",
            Self::TaskUpdate => "Update task details (title, description, status, priority).",
            Self::TaskDelete => "Delete a task.",
            Self::TaskAssignUser => "Assign or unassign users to a task.",
            Self::TaskChangeStatus => "Change a task's status.",
            Self::TaskComment => "Add comments to a task.",
            Self::TaskManageAttachments => "Add or delete attachments on a task.",
            Self::ReportsView => "View project and organization analytics dashboards.",
            Self::ReportsExport => "Export reports as CSV or PDF.",
        }
    }

    /// Returns the resource group of this permission.
    #[must_use]
    pub fn group(&self) -> PermissionGroup {
        match self {
            Self::OrganizationReadDetails
            | Self::OrganizationUpdateSettings
            | Self::OrganizationDelete
            | Self::OrganizationManageMembers
            | Self::OrganizationManageRoles
            | Self::OrganizationCreateCustomRoles
            | Self::OrganizationManageCustomRoles
            | Self::OrganizationViewAuditLog
            | Self::OrganizationManageBilling => PermissionGroup::Organization,
            Self::TeamCreate
            | Self::TeamRead
            | Self::TeamUpdate
            | Self::TeamDelete
            | Self::TeamManageMembers => PermissionGroup::Team,
            Self::ProjectCreate
            | Self::ProjectRead
            | Self::ProjectUpdate
            | Self::ProjectDelete
            | Self::ProjectManageMembers
            | Self::ProjectChangeStatus => PermissionGroup::Project,
            Self::TaskCreate
            | Self::TaskRead
            | Self::TaskUpdate
            | Self::TaskDelete
            | Self::TaskAssignUser
            | Self::TaskChangeStatus
            | Self::TaskComment
            | Self::TaskManageAttachments => PermissionGroup::Task,
            Self::ReportsView | Self::ReportsExport => PermissionGroup::Report,
        }
    }

    /// Returns all known permissions in catalog order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        ALL
    }

    /// Returns the permissions of one resource group in catalog order.
    pub fn in_group(group: PermissionGroup) -> impl Iterator<Item = Self> {
        ALL.iter().copied().filter(move |permission| permission.group() == group)
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ALL.iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

/// Catalog entry as materialized into storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionDefinition {
    /// Globally unique `resource:action` name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Resource group.
    pub group: PermissionGroup,
}

impl From<Permission> for PermissionDefinition {
    fn from(permission: Permission) -> Self {
        Self {
            name: permission.as_str(),
            description: permission.description(),
            group: permission.group(),
        }
    }
}

/// Lists every catalog entry ordered by resource group.
#[must_use]
pub fn list_all_permission_definitions() -> Vec<PermissionDefinition> {
    let mut definitions: Vec<PermissionDefinition> =
        ALL.iter().copied().map(PermissionDefinition::from).collect();
    definitions.sort_by_key(|definition| definition.group);
    definitions
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use super::{Permission, PermissionGroup, list_all_permission_definitions};

    #[test]
    fn permission_names_are_unique_and_resource_prefixed() {
        let names: HashSet<&str> = Permission::all().iter().map(Permission::as_str).collect();
        assert_eq!(names.len(), Permission::all().len());
        assert!(names.iter().all(|name| name.split_once(':').is_some()));
    }

    #[test]
    fn storage_names_parse_back() {
        let parsed = Permission::from_str("organization:manage_members");
        assert_eq!(parsed.ok(), Some(Permission::OrganizationManageMembers));
        assert!(Permission::from_str("organization:launch_rockets").is_err());
    }

    #[test]
    fn definitions_are_ordered_by_group() {
        let definitions = list_all_permission_definitions();
        assert_eq!(definitions.len(), 30);
        assert_eq!(definitions[0].name, "organization:read_details");
        assert_eq!(definitions[9].group, PermissionGroup::Team);
        assert_eq!(
            definitions.last().map(|definition| definition.name),
            Some("reports:export")
        );
        assert!(definitions.windows(2).all(|pair| pair[0].group <= pair[1].group));
    }

    #[test]
    fn groups_partition_the_catalog() {
        let counts: Vec<usize> = [
            PermissionGroup::Organization,
            PermissionGroup::Team,
            PermissionGroup::Project,
            PermissionGroup::Task,
            PermissionGroup::Report,
        ]
        .into_iter()
        .map(|group| Permission::in_group(group).count())
        .collect();

        assert_eq!(counts, vec![9, 5, 6, 8, 2]);
    }
}
