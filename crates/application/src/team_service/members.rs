use crate::{AddMemberEntry, MemberOutcome, MemberResponse};
use taskhub_domain::RoleId;

use super::*;

impl TeamService {
    /// Adds members to a team, one outcome per entry.
    pub async fn add_members(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        team_id: TeamId,
        entries: Vec<AddMemberEntry>,
    ) -> AppResult<Vec<MemberOutcome>> {
        let scope = self
            .member_manager_scope(actor, organization_id, team_id)
            .await?;
        let default_role_name = self
            .bootstrap_service
            .default_member_role_name(ScopeKind::Team)?;

        Ok(self
            .membership_service
            .add_members_batch(actor, scope, entries, default_role_name)
            .await)
    }

    /// Lists team members.
    pub async fn list_members(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        team_id: TeamId,
        page: PageRequest,
    ) -> AppResult<Page<MemberResponse>> {
        let scope = self
            .member_manager_scope(actor, organization_id, team_id)
            .await?;
        self.membership_service.list_members(scope, page).await
    }

    /// Assigns another team role to a member.
    pub async fn update_member_role(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        team_id: TeamId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<MemberResponse> {
        let scope = self
            .member_manager_scope(actor, organization_id, team_id)
            .await?;
        self.membership_service
            .update_member_role(actor, scope, user_id, role_id)
            .await
    }

    /// Removes a member from the team.
    pub async fn remove_member(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        team_id: TeamId,
        user_id: UserId,
    ) -> AppResult<()> {
        let scope = self
            .member_manager_scope(actor, organization_id, team_id)
            .await?;
        self.membership_service
            .remove_member(actor, scope, user_id)
            .await
    }

    async fn member_manager_scope(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        team_id: TeamId,
    ) -> AppResult<Scope> {
        self.authorized_team(actor, organization_id, team_id, Permission::TeamManageMembers)
            .await
            .map(|team| team.scope())
    }
}
