use std::sync::Arc;

use taskhub_core::{AccessError, AppError, AppResult, Scope, ScopeKind};
use taskhub_domain::{
    DEFAULT_MEMBER_TEMPLATE_KEY, NewRole, OrganizationId, Permission, Role, RoleTemplate,
    RoleTemplateRegistry, TeamId,
};
use tracing::{info, warn};

use crate::AccessControlRepository;

/// Outcome of materializing templates into one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Roles created during this run.
    pub created_roles: Vec<Role>,
    /// Template role names that already existed and were left untouched.
    pub skipped_roles: Vec<String>,
}

/// Seeds catalog permissions and per-scope default roles.
#[derive(Clone)]
pub struct RoleBootstrapService {
    repository: Arc<dyn AccessControlRepository>,
    registry: Arc<RoleTemplateRegistry>,
}

impl RoleBootstrapService {
    /// Creates a bootstrap service over a template registry.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AccessControlRepository>,
        registry: Arc<RoleTemplateRegistry>,
    ) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// Returns the registry used for bootstrap and owner assignment.
    #[must_use]
    pub fn registry(&self) -> &RoleTemplateRegistry {
        &self.registry
    }

    /// Persists every catalog permission that is not stored yet.
    ///
    /// Returns the number of permissions created by this call.
    pub async fn ensure_global_permissions_exist(&self) -> AppResult<usize> {
        let mut created = 0;

        for permission in Permission::all() {
            let name = permission.as_str();
            if self.repository.find_permission_by_name(name).await?.is_some() {
                continue;
            }

            match self
                .repository
                .create_permission(name, permission.description())
                .await
            {
                Ok(_) => created += 1,
                Err(AppError::Conflict(message)) => {
                    warn!(permission = name, %message, "permission created concurrently");
                }
                Err(error) => return Err(error),
            }
        }

        if created > 0 {
            info!(created, "catalog permissions seeded");
        }

        Ok(created)
    }

    /// Materializes the organization templates for one organization.
    pub async fn bootstrap_organization_roles(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<BootstrapReport> {
        self.bootstrap_scope_roles(organization_id.into()).await
    }

    /// Materializes the team templates for one team.
    pub async fn bootstrap_team_roles(&self, team_id: TeamId) -> AppResult<BootstrapReport> {
        self.bootstrap_scope_roles(team_id.into()).await
    }

    /// Creates every template role of the scope's kind that does not exist yet.
    ///
    /// Existing roles are skipped without touching their permissions. A
    /// template naming a permission that is not stored fails with
    /// `AccessError::PermissionNotFound`.
    pub async fn bootstrap_scope_roles(&self, scope: Scope) -> AppResult<BootstrapReport> {
        let mut report = BootstrapReport {
            created_roles: Vec::new(),
            skipped_roles: Vec::new(),
        };

        for template in self.registry.templates(scope.kind()) {
            if self
                .repository
                .find_role_by_name_and_scope(template.name(), scope)
                .await?
                .is_some()
            {
                report.skipped_roles.push(template.name().to_owned());
                continue;
            }

            let role = self
                .repository
                .create_role(NewRole {
                    name: template.name().to_owned(),
                    description: template.description().to_owned(),
                    is_system_role: true,
                    scope,
                })
                .await?;
            self.link_template_permissions(&role, template).await?;
            report.created_roles.push(role);
        }

        info!(
            %scope,
            created = report.created_roles.len(),
            skipped = report.skipped_roles.len(),
            "scope roles bootstrapped"
        );

        Ok(report)
    }

    /// Returns the stored role created from the owner template of the scope's kind.
    pub async fn owner_role(&self, scope: Scope) -> AppResult<Role> {
        let name = self.registry.owner(scope.kind()).name();
        self.repository
            .find_role_by_name_and_scope(name, scope)
            .await?
            .ok_or_else(|| {
                AccessError::RoleNotFound {
                    role: name.to_owned(),
                    scope,
                }
                .into()
            })
    }

    /// Returns the role name given to added members that name no role.
    pub fn default_member_role_name(&self, kind: ScopeKind) -> AppResult<&str> {
        self.registry
            .find(kind, DEFAULT_MEMBER_TEMPLATE_KEY)
            .map(RoleTemplate::name)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "a role name is required: no default member role exists for {kind} scopes"
                ))
            })
    }

    async fn link_template_permissions(
        &self,
        role: &Role,
        template: &RoleTemplate,
    ) -> AppResult<()> {
        for permission_name in template.permission_names() {
            let permission = self
                .repository
                .find_permission_by_name(permission_name)
                .await?
                .ok_or_else(|| AccessError::PermissionNotFound(permission_name.clone()))?;

            self.repository
                .create_role_permission_link(role.id, permission.id)
                .await?;
        }

        Ok(())
    }
}
