use std::sync::Arc;

use taskhub_core::{AccessError, AppError, AppResult, Scope};
use taskhub_domain::{Permission, RolePermission, UserId};
use tracing::debug;

use crate::AccessControlRepository;

/// Evaluates scoped permission requirements against the role graph.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AccessControlRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessControlRepository>) -> Self {
        Self { repository }
    }

    /// Verifies that the user's role in `scope` grants every required permission.
    ///
    /// Requirements are checked in the given order and the first missing one
    /// fails the call. On success the matching role links are returned in the
    /// same order; an empty requirement list succeeds for any member.
    pub async fn verify(
        &self,
        user_id: UserId,
        scope: Scope,
        required: &[&str],
    ) -> AppResult<Vec<RolePermission>> {
        let membership = self
            .repository
            .find_membership(user_id, scope)
            .await?
            .ok_or(AccessError::ScopeMembershipNotFound {
                user_id: user_id.as_uuid(),
                scope,
            })?;

        let mut granted = Vec::with_capacity(required.len());
        for name in required {
            let permission = self
                .repository
                .find_permission_by_name(name)
                .await?
                .ok_or_else(|| AccessError::PermissionNotFound((*name).to_owned()))?;

            let Some(link) = self
                .repository
                .find_role_permission_link(membership.role_id, permission.id)
                .await?
            else {
                debug!(%user_id, %scope, permission = *name, "permission denied");
                return Err(AccessError::Forbidden((*name).to_owned()).into());
            };

            granted.push(link);
        }

        debug!(%user_id, %scope, checked = required.len(), "permissions granted");
        Ok(granted)
    }

    /// Ensures the user holds one catalog permission in `scope`.
    pub async fn require_permission(
        &self,
        user_id: UserId,
        scope: Scope,
        permission: Permission,
    ) -> AppResult<()> {
        self.verify(user_id, scope, &[permission.as_str()])
            .await
            .map(|_| ())
    }

    /// Returns whether the user currently holds the permission in `scope`.
    ///
    /// Non-members and missing grants yield `false`; storage and catalog
    /// failures are still returned as errors.
    pub async fn has_permission(
        &self,
        user_id: UserId,
        scope: Scope,
        permission: Permission,
    ) -> AppResult<bool> {
        match self.require_permission(user_id, scope, permission).await {
            Ok(()) => Ok(true),
            Err(AppError::Access(
                AccessError::Forbidden(_) | AccessError::ScopeMembershipNotFound { .. },
            )) => Ok(false),
            Err(error) => Err(error),
        }
    }
}
