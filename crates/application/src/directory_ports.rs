use async_trait::async_trait;
use taskhub_core::{AppResult, PageRequest};
use taskhub_domain::{
    Organization, OrganizationDraft, OrganizationId, Team, TeamDraft, TeamId, UserId,
};

/// Input payload for organization creation and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationInput {
    /// Organization display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Input payload for team creation and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamInput {
    /// Team name, unique within the organization.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Repository port for organizations.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Persists a new organization. Duplicate names fail with `AppError::Conflict`.
    async fn create_organization(
        &self,
        draft: &OrganizationDraft,
        owner_id: UserId,
    ) -> AppResult<Organization>;

    /// Finds an organization by identifier.
    async fn find_organization(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>>;

    /// Lists one page of the organizations a user is a member of, ordered by name.
    async fn list_organizations_for_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> AppResult<Vec<Organization>>;

    /// Counts the organizations a user is a member of.
    async fn count_organizations_for_user(&self, user_id: UserId) -> AppResult<u64>;

    /// Replaces name and description. Returns `None` when the organization is gone.
    async fn update_organization(
        &self,
        organization_id: OrganizationId,
        draft: &OrganizationDraft,
    ) -> AppResult<Option<Organization>>;

    /// Deletes an organization together with its teams, roles and memberships.
    async fn delete_organization(&self, organization_id: OrganizationId) -> AppResult<bool>;
}

/// Repository port for teams.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Persists a new team. Duplicate names inside one organization fail with
    /// `AppError::Conflict`.
    async fn create_team(
        &self,
        organization_id: OrganizationId,
        draft: &TeamDraft,
        owner_id: UserId,
    ) -> AppResult<Team>;

    /// Finds a team by identifier.
    async fn find_team(&self, team_id: TeamId) -> AppResult<Option<Team>>;

    /// Lists one page of an organization's teams ordered by name.
    async fn list_teams(
        &self,
        organization_id: OrganizationId,
        page: PageRequest,
    ) -> AppResult<Vec<Team>>;

    /// Counts an organization's teams.
    async fn count_teams(&self, organization_id: OrganizationId) -> AppResult<u64>;

    /// Replaces name and description. Returns `None` when the team is gone.
    async fn update_team(&self, team_id: TeamId, draft: &TeamDraft) -> AppResult<Option<Team>>;

    /// Deletes a team together with its roles and memberships.
    async fn delete_team(&self, team_id: TeamId) -> AppResult<bool>;
}
