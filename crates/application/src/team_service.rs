use std::sync::Arc;

use taskhub_core::{AppError, AppResult, Page, PageRequest, Scope, ScopeKind};
use taskhub_domain::{AuditAction, OrganizationId, Permission, Team, TeamDraft, TeamId, UserId};
use tracing::{info, warn};

use crate::{
    AccessControlRepository, AuditEvent, AuditRepository, AuthorizationService,
    MembershipService, OrganizationRepository, RoleBootstrapService, TeamInput, TeamRepository,
};

mod members;

/// Team composed with its member count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSummary {
    /// Stored team.
    pub team: Team,
    /// Number of team members.
    pub member_count: u64,
}

/// Application service for teams nested in organizations.
///
/// Creation, listing and deletion are authorized in the organization scope;
/// updates and member management are authorized in the team's own scope.
#[derive(Clone)]
pub struct TeamService {
    repository: Arc<dyn TeamRepository>,
    organization_repository: Arc<dyn OrganizationRepository>,
    access_repository: Arc<dyn AccessControlRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    authorization_service: AuthorizationService,
    bootstrap_service: RoleBootstrapService,
    membership_service: MembershipService,
}

impl TeamService {
    /// Creates a new team service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn TeamRepository>,
        organization_repository: Arc<dyn OrganizationRepository>,
        access_repository: Arc<dyn AccessControlRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        authorization_service: AuthorizationService,
        bootstrap_service: RoleBootstrapService,
        membership_service: MembershipService,
    ) -> Self {
        Self {
            repository,
            organization_repository,
            access_repository,
            audit_repository,
            authorization_service,
            bootstrap_service,
            membership_service,
        }
    }

    /// Creates a team, seeds its default roles and makes the actor its owner.
    /// A team whose setup fails after the insert is deleted again.
    pub async fn create_team(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        input: TeamInput,
    ) -> AppResult<Team> {
        self.authorize_in_organization(actor, organization_id, Permission::TeamCreate)
            .await?;
        let draft = TeamDraft::new(input.name, input.description)?;
        let team = self
            .repository
            .create_team(organization_id, &draft, actor)
            .await?;

        if let Err(error) = self.set_up_team(actor, &team).await {
            self.roll_back_team(team.id).await;
            return Err(error);
        }
        info!(%organization_id, team_id = %team.id, name = %team.name, "team created");

        Ok(team)
    }

    async fn set_up_team(&self, actor: UserId, team: &Team) -> AppResult<()> {
        let scope = team.scope();

        self.bootstrap_service
            .ensure_global_permissions_exist()
            .await?;
        let report = self.bootstrap_service.bootstrap_team_roles(team.id).await?;
        let owner_role = self.bootstrap_service.owner_role(scope).await?;
        self.access_repository
            .create_membership(actor, scope, owner_role.id)
            .await?;

        self.audit(
            actor,
            team,
            AuditAction::RolesBootstrapped,
            format!("created {} default roles", report.created_roles.len()),
        )
        .await?;
        self.audit(
            actor,
            team,
            AuditAction::TeamCreated,
            format!("created team '{}'", team.name),
        )
        .await
    }

    async fn roll_back_team(&self, team_id: TeamId) {
        match self.repository.delete_team(team_id).await {
            Ok(_) => warn!(%team_id, "team creation rolled back"),
            Err(error) => warn!(%team_id, %error, "failed to roll back team creation"),
        }
    }

    /// Lists an organization's teams with their member counts.
    pub async fn list_teams(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        page: PageRequest,
    ) -> AppResult<Page<TeamSummary>> {
        self.authorize_in_organization(actor, organization_id, Permission::TeamRead)
            .await?;
        let total = self.repository.count_teams(organization_id).await?;
        let teams = self.repository.list_teams(organization_id, page).await?;

        let mut summaries = Vec::with_capacity(teams.len());
        for team in teams {
            summaries.push(self.summarize(team).await?);
        }

        Ok(Page::new(summaries, total, page))
    }

    /// Returns one team with its member count.
    pub async fn get_team(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        team_id: TeamId,
    ) -> AppResult<TeamSummary> {
        self.authorize_in_organization(actor, organization_id, Permission::TeamRead)
            .await?;
        let team = self.load_team(organization_id, team_id).await?;
        self.summarize(team).await
    }

    /// Replaces a team's name and description.
    pub async fn update_team(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        team_id: TeamId,
        input: TeamInput,
    ) -> AppResult<Team> {
        let team = self
            .authorized_team(actor, organization_id, team_id, Permission::TeamUpdate)
            .await?;
        let draft = TeamDraft::new(input.name, input.description)?;
        let team = self
            .repository
            .update_team(team.id, &draft)
            .await?
            .ok_or_else(|| Self::not_found(team_id))?;

        self.audit(
            actor,
            &team,
            AuditAction::TeamUpdated,
            format!("renamed to '{}'", team.name),
        )
        .await?;

        Ok(team)
    }

    /// Deletes a team with its roles and memberships.
    pub async fn delete_team(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        team_id: TeamId,
    ) -> AppResult<()> {
        self.authorize_in_organization(actor, organization_id, Permission::TeamDelete)
            .await?;
        let team = self.load_team(organization_id, team_id).await?;
        if !self.repository.delete_team(team.id).await? {
            return Err(Self::not_found(team_id));
        }

        self.audit(
            actor,
            &team,
            AuditAction::TeamDeleted,
            format!("deleted team '{}'", team.name),
        )
        .await?;
        info!(%organization_id, %team_id, "team deleted");

        Ok(())
    }

    async fn summarize(&self, team: Team) -> AppResult<TeamSummary> {
        let member_count = self.membership_service.count_members(team.scope()).await?;
        Ok(TeamSummary { team, member_count })
    }

    async fn authorize_in_organization(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        permission: Permission,
    ) -> AppResult<()> {
        if self
            .organization_repository
            .find_organization(organization_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "organization '{organization_id}' does not exist"
            )));
        }

        self.authorization_service
            .require_permission(actor, organization_id.into(), permission)
            .await
    }

    /// Loads a team of the organization and checks one permission of the actor in the team.
    async fn authorized_team(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        team_id: TeamId,
        permission: Permission,
    ) -> AppResult<Team> {
        let team = self.load_team(organization_id, team_id).await?;
        self.authorization_service
            .require_permission(actor, team.scope(), permission)
            .await?;

        Ok(team)
    }

    // Teams of other organizations are reported as missing.
    async fn load_team(&self, organization_id: OrganizationId, team_id: TeamId) -> AppResult<Team> {
        self.repository
            .find_team(team_id)
            .await?
            .filter(|team| team.organization_id == organization_id)
            .ok_or_else(|| Self::not_found(team_id))
    }

    fn not_found(team_id: TeamId) -> AppError {
        AppError::NotFound(format!("team '{team_id}' does not exist"))
    }

    async fn audit(
        &self,
        actor: UserId,
        team: &Team,
        action: AuditAction,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                scope: team.scope(),
                actor,
                action,
                resource_type: "team".to_owned(),
                resource_id: team.id.to_string(),
                detail: Some(detail),
            })
            .await
    }
}

#[cfg(test)]
mod tests;
