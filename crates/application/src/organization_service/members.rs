use crate::{AddMemberEntry, MemberOutcome, MemberResponse};
use taskhub_domain::RoleId;

use super::*;

impl OrganizationService {
    /// Adds members to an organization, one outcome per entry.
    pub async fn add_members(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        entries: Vec<AddMemberEntry>,
    ) -> AppResult<Vec<MemberOutcome>> {
        let scope = self.member_manager_scope(actor, organization_id).await?;
        let default_role_name = self
            .bootstrap_service
            .default_member_role_name(ScopeKind::Organization)?;

        Ok(self
            .membership_service
            .add_members_batch(actor, scope, entries, default_role_name)
            .await)
    }

    /// Lists organization members.
    pub async fn list_members(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        page: PageRequest,
    ) -> AppResult<Page<MemberResponse>> {
        let scope = self.member_manager_scope(actor, organization_id).await?;
        self.membership_service.list_members(scope, page).await
    }

    /// Assigns another organization role to a member. Requires `organization:manage_roles`.
    pub async fn update_member_role(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<MemberResponse> {
        let scope = self
            .authorized_organization(actor, organization_id, Permission::OrganizationManageRoles)
            .await?
            .scope();
        self.membership_service
            .update_member_role(actor, scope, user_id, role_id)
            .await
    }

    /// Removes a member from the organization.
    pub async fn remove_member(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        user_id: UserId,
    ) -> AppResult<()> {
        let scope = self.member_manager_scope(actor, organization_id).await?;
        self.membership_service
            .remove_member(actor, scope, user_id)
            .await
    }

    async fn member_manager_scope(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<Scope> {
        self.authorized_organization(actor, organization_id, Permission::OrganizationManageMembers)
            .await
            .map(|organization| organization.scope())
    }
}
