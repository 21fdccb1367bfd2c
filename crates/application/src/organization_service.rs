use std::sync::Arc;

use taskhub_core::{AppError, AppResult, Page, PageRequest, Scope, ScopeKind};
use taskhub_domain::{
    AuditAction, Organization, OrganizationDraft, OrganizationId, Permission, Role, UserId,
    UserProfile,
};
use tracing::{info, warn};

use crate::{
    AccessControlRepository, AuditEvent, AuditRepository, AuthorizationService,
    MembershipService, OrganizationInput, OrganizationRepository, RoleBootstrapService,
};

mod members;

/// Organization composed with its owner profile and member count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationDetails {
    /// Stored organization.
    pub organization: Organization,
    /// Profile of the creating user.
    pub owner: UserProfile,
    /// Number of organization members.
    pub member_count: u64,
}

/// Role of one scope together with its granted permission names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSummary {
    /// Stored role.
    pub role: Role,
    /// Granted permission names, sorted.
    pub permission_names: Vec<String>,
}

/// Application service for organization lifecycle and organization members.
#[derive(Clone)]
pub struct OrganizationService {
    repository: Arc<dyn OrganizationRepository>,
    access_repository: Arc<dyn AccessControlRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    authorization_service: AuthorizationService,
    bootstrap_service: RoleBootstrapService,
    membership_service: MembershipService,
}

impl OrganizationService {
    /// Creates a new organization service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn OrganizationRepository>,
        access_repository: Arc<dyn AccessControlRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        authorization_service: AuthorizationService,
        bootstrap_service: RoleBootstrapService,
        membership_service: MembershipService,
    ) -> Self {
        Self {
            repository,
            access_repository,
            audit_repository,
            authorization_service,
            bootstrap_service,
            membership_service,
        }
    }

    /// Creates an organization, seeds its default roles and makes the actor its owner.
    ///
    /// When any step after the insert fails the organization is deleted again
    /// and the original error is returned.
    pub async fn create_organization(
        &self,
        actor: UserId,
        input: OrganizationInput,
    ) -> AppResult<Organization> {
        let draft = OrganizationDraft::new(input.name, input.description)?;
        let organization = self.repository.create_organization(&draft, actor).await?;

        if let Err(error) = self.set_up_organization(actor, &organization).await {
            self.roll_back_organization(organization.id).await;
            return Err(error);
        }
        info!(
            organization_id = %organization.id,
            name = %organization.name,
            "organization created"
        );

        Ok(organization)
    }

    async fn set_up_organization(&self, actor: UserId, organization: &Organization) -> AppResult<()> {
        let scope = organization.scope();

        self.bootstrap_service
            .ensure_global_permissions_exist()
            .await?;
        let report = self
            .bootstrap_service
            .bootstrap_organization_roles(organization.id)
            .await?;
        let owner_role = self.bootstrap_service.owner_role(scope).await?;
        self.access_repository
            .create_membership(actor, scope, owner_role.id)
            .await?;

        self.audit(
            actor,
            scope,
            AuditAction::RolesBootstrapped,
            format!("created {} default roles", report.created_roles.len()),
        )
        .await?;
        self.audit(
            actor,
            scope,
            AuditAction::OrganizationCreated,
            format!("created organization '{}'", organization.name),
        )
        .await
    }

    async fn roll_back_organization(&self, organization_id: OrganizationId) {
        match self.repository.delete_organization(organization_id).await {
            Ok(_) => warn!(%organization_id, "organization creation rolled back"),
            Err(error) => {
                warn!(%organization_id, %error, "failed to roll back organization creation");
            }
        }
    }

    /// Lists the organizations the actor belongs to.
    pub async fn list_organizations_for_user(
        &self,
        actor: UserId,
        page: PageRequest,
    ) -> AppResult<Page<Organization>> {
        let total = self.repository.count_organizations_for_user(actor).await?;
        let organizations = self
            .repository
            .list_organizations_for_user(actor, page)
            .await?;

        Ok(Page::new(organizations, total, page))
    }

    /// Returns an organization with its owner profile and member count.
    pub async fn get_organization(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<OrganizationDetails> {
        let organization = self
            .authorized_organization(actor, organization_id, Permission::OrganizationReadDetails)
            .await?;
        let owner = self
            .access_repository
            .find_user_by_id(organization.owner_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "organization '{organization_id}' references missing owner '{}'",
                    organization.owner_id
                ))
            })?;
        let member_count = self
            .membership_service
            .count_members(organization.scope())
            .await?;

        Ok(OrganizationDetails {
            organization,
            owner,
            member_count,
        })
    }

    /// Replaces an organization's name and description.
    pub async fn update_organization(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        input: OrganizationInput,
    ) -> AppResult<Organization> {
        self.authorized_organization(
            actor,
            organization_id,
            Permission::OrganizationUpdateSettings,
        )
        .await?;
        let draft = OrganizationDraft::new(input.name, input.description)?;
        let organization = self
            .repository
            .update_organization(organization_id, &draft)
            .await?
            .ok_or_else(|| Self::not_found(organization_id))?;

        self.audit(
            actor,
            organization.scope(),
            AuditAction::OrganizationUpdated,
            format!("renamed to '{}'", organization.name),
        )
        .await?;

        Ok(organization)
    }

    /// Deletes an organization with its teams, roles and memberships.
    pub async fn delete_organization(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<()> {
        let organization = self
            .authorized_organization(actor, organization_id, Permission::OrganizationDelete)
            .await?;
        if !self.repository.delete_organization(organization_id).await? {
            return Err(Self::not_found(organization_id));
        }

        self.audit(
            actor,
            organization.scope(),
            AuditAction::OrganizationDeleted,
            format!("deleted organization '{}'", organization.name),
        )
        .await?;
        info!(%organization_id, "organization deleted");

        Ok(())
    }

    /// Lists the organization's roles with their permission names.
    pub async fn list_roles(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<RoleSummary>> {
        let organization = self
            .authorized_organization(actor, organization_id, Permission::OrganizationReadDetails)
            .await?;
        let roles = self
            .access_repository
            .list_roles_for_scope(organization.scope())
            .await?;

        let mut summaries = Vec::with_capacity(roles.len());
        for role in roles {
            let permission_names = self
                .access_repository
                .list_role_permission_names(role.id)
                .await?;
            summaries.push(RoleSummary {
                role,
                permission_names,
            });
        }

        Ok(summaries)
    }

    /// Loads an organization and checks one permission of the actor in it.
    async fn authorized_organization(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        permission: Permission,
    ) -> AppResult<Organization> {
        let organization = self
            .repository
            .find_organization(organization_id)
            .await?
            .ok_or_else(|| Self::not_found(organization_id))?;
        self.authorization_service
            .require_permission(actor, organization.scope(), permission)
            .await?;

        Ok(organization)
    }

    fn not_found(organization_id: OrganizationId) -> AppError {
        AppError::NotFound(format!("organization '{organization_id}' does not exist"))
    }

    async fn audit(
        &self,
        actor: UserId,
        scope: Scope,
        action: AuditAction,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                scope,
                actor,
                action,
                resource_type: "organization".to_owned(),
                resource_id: scope.id().to_string(),
                detail: Some(detail),
            })
            .await
    }
}
