//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod catalog;
mod directory;
mod ids;
mod templates;
mod user;

pub use access::{AuditAction, Membership, NewRole, PermissionRecord, Role, RolePermission};
pub use catalog::{
    Permission, PermissionDefinition, PermissionGroup, list_all_permission_definitions,
};
pub use directory::{
    DESCRIPTION_MAX_LENGTH, ORGANIZATION_NAME_LENGTH, Organization, OrganizationDraft,
    TEAM_NAME_LENGTH, Team, TeamDraft,
};
pub use ids::{OrganizationId, PermissionId, RoleId, TeamId, UserId};
pub use templates::{
    DEFAULT_MEMBER_TEMPLATE_KEY, OWNER_TEMPLATE_KEY, RoleTemplate, RoleTemplateRegistry,
};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, PERSON_NAME_LENGTH, USERNAME_LENGTH,
    UserProfile, Username, validate_password, validate_person_name,
};
