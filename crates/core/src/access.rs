use thiserror::Error;
use uuid::Uuid;

use crate::Scope;

/// Failures reported by the authorization evaluator, bootstrap and membership flows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The principal has no membership in the organization or team.
    #[error("user '{user_id}' is not a member of {scope}")]
    ScopeMembershipNotFound {
        /// Principal that was checked.
        user_id: Uuid,
        /// Scope the membership was looked up in.
        scope: Scope,
    },

    /// A permission name is not registered in the persisted catalog.
    #[error("permission '{0}' is not registered")]
    PermissionNotFound(String),

    /// The principal's role lacks the named permission.
    #[error("missing permission '{0}'")]
    Forbidden(String),

    /// No role with this name or id exists in the scope.
    #[error("role '{role}' does not exist in {scope}")]
    RoleNotFound {
        /// Role name or id as supplied by the caller.
        role: String,
        /// Scope the role was looked up in.
        scope: Scope,
    },

    /// The membership target is not a registered user.
    #[error("user '{0}' not found")]
    UserNotFound(String),

    /// The user already holds a role in the scope.
    #[error("user '{user_id}' is already a member of {scope}")]
    AlreadyMember {
        /// User that was being added.
        user_id: Uuid,
        /// Scope the membership already exists in.
        scope: Scope,
    },
}
