use async_trait::async_trait;
use chrono::Utc;
use taskhub_application::{OrganizationRepository, TeamRepository};
use taskhub_core::{AppError, AppResult, PageRequest, Scope};
use taskhub_domain::{
    Organization, OrganizationDraft, OrganizationId, Team, TeamDraft, TeamId, UserId,
};

use super::{InMemoryAccessRepository, page_slice};

#[async_trait]
impl OrganizationRepository for InMemoryAccessRepository {
    async fn create_organization(
        &self,
        draft: &OrganizationDraft,
        owner_id: UserId,
    ) -> AppResult<Organization> {
        let mut state = self.state.write().await;
        if state
            .organizations
            .values()
            .any(|organization| organization.name == draft.name())
        {
            return Err(AppError::Conflict(format!(
                "name '{}' is already taken",
                draft.name()
            )));
        }

        let now = Utc::now();
        let organization = Organization {
            id: OrganizationId::new(),
            name: draft.name().to_owned(),
            description: draft.description().map(str::to_owned),
            owner_id,
            created_at: now,
            updated_at: now,
        };
        state
            .organizations
            .insert(organization.id, organization.clone());
        Ok(organization)
    }

    async fn find_organization(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        let state = self.state.read().await;
        Ok(state.organizations.get(&organization_id).cloned())
    }

    async fn list_organizations_for_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> AppResult<Vec<Organization>> {
        let state = self.state.read().await;
        let mut organizations: Vec<Organization> = state
            .organizations
            .values()
            .filter(|organization| {
                state
                    .memberships
                    .contains_key(&(user_id, organization.scope()))
            })
            .cloned()
            .collect();
        organizations.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(page_slice(&organizations, page))
    }

    async fn count_organizations_for_user(&self, user_id: UserId) -> AppResult<u64> {
        let state = self.state.read().await;
        let count = state
            .organizations
            .values()
            .filter(|organization| {
                state
                    .memberships
                    .contains_key(&(user_id, organization.scope()))
            })
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn update_organization(
        &self,
        organization_id: OrganizationId,
        draft: &OrganizationDraft,
    ) -> AppResult<Option<Organization>> {
        let mut state = self.state.write().await;
        if state.organizations.values().any(|organization| {
            organization.id != organization_id && organization.name == draft.name()
        }) {
            return Err(AppError::Conflict(format!(
                "name '{}' is already taken",
                draft.name()
            )));
        }

        Ok(state
            .organizations
            .get_mut(&organization_id)
            .map(|organization| {
                organization.name = draft.name().to_owned();
                organization.description = draft.description().map(str::to_owned);
                organization.updated_at = Utc::now();
                organization.clone()
            }))
    }

    async fn delete_organization(&self, organization_id: OrganizationId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let Some(organization) = state.organizations.remove(&organization_id) else {
            return Ok(false);
        };

        let mut scopes = vec![organization.scope()];
        state.teams.retain(|_, team| {
            if team.organization_id == organization_id {
                scopes.push(team.scope());
                return false;
            }
            true
        });
        state.purge_scopes(&scopes);

        Ok(true)
    }
}

#[async_trait]
impl TeamRepository for InMemoryAccessRepository {
    async fn create_team(
        &self,
        organization_id: OrganizationId,
        draft: &TeamDraft,
        owner_id: UserId,
    ) -> AppResult<Team> {
        let mut state = self.state.write().await;
        if !state.organizations.contains_key(&organization_id) {
            return Err(AppError::NotFound(format!(
                "organization '{organization_id}' does not exist"
            )));
        }

        if state
            .teams
            .values()
            .any(|team| team.organization_id == organization_id && team.name == draft.name())
        {
            return Err(AppError::Conflict(format!(
                "name '{}' is already taken",
                draft.name()
            )));
        }

        let now = Utc::now();
        let team = Team {
            id: TeamId::new(),
            name: draft.name().to_owned(),
            description: draft.description().map(str::to_owned),
            organization_id,
            owner_id,
            created_at: now,
            updated_at: now,
        };
        state.teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn find_team(&self, team_id: TeamId) -> AppResult<Option<Team>> {
        Ok(self.state.read().await.teams.get(&team_id).cloned())
    }

    async fn list_teams(
        &self,
        organization_id: OrganizationId,
        page: PageRequest,
    ) -> AppResult<Vec<Team>> {
        let state = self.state.read().await;
        let mut teams: Vec<Team> = state
            .teams
            .values()
            .filter(|team| team.organization_id == organization_id)
            .cloned()
            .collect();
        teams.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(page_slice(&teams, page))
    }

    async fn count_teams(&self, organization_id: OrganizationId) -> AppResult<u64> {
        let state = self.state.read().await;
        let count = state
            .teams
            .values()
            .filter(|team| team.organization_id == organization_id)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn update_team(&self, team_id: TeamId, draft: &TeamDraft) -> AppResult<Option<Team>> {
        let mut state = self.state.write().await;
        let Some(organization_id) = state.teams.get(&team_id).map(|team| team.organization_id)
        else {
            return Ok(None);
        };

        if state.teams.values().any(|team| {
            team.id != team_id
                && team.organization_id == organization_id
                && team.name == draft.name()
        }) {
            return Err(AppError::Conflict(format!(
                "name '{}' is already taken",
                draft.name()
            )));
        }

        Ok(state.teams.get_mut(&team_id).map(|team| {
            team.name = draft.name().to_owned();
            team.description = draft.description().map(str::to_owned);
            team.updated_at = Utc::now();
            team.clone()
        }))
    }

    async fn delete_team(&self, team_id: TeamId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.teams.remove(&team_id).is_none() {
            return Ok(false);
        }

        state.purge_scopes(&[Scope::from(team_id)]);
        Ok(true)
    }
}
