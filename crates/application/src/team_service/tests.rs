use std::sync::Arc;

use taskhub_core::{AccessError, AppError, PageRequest};
use taskhub_domain::{AuditAction, Organization, OrganizationId, Team, UserProfile};

use crate::test_support::{
    FakeStore, organization_service, registry_with_unknown_permission, team_service,
    team_service_with,
};
use crate::{
    AccessControlRepository, AddMemberEntry, MemberOutcome, OrganizationInput, TeamInput,
};

async fn seed_organization(store: &Arc<FakeStore>, name: &str) -> (UserProfile, Organization) {
    let owner = store
        .add_user(&format!("{}-owner", name.to_lowercase().replace(' ', "-")))
        .await;
    let organization = organization_service(store)
        .create_organization(
            owner.id,
            OrganizationInput {
                name: name.to_owned(),
                description: None,
            },
        )
        .await
        .unwrap_or_else(|error| panic!("organization failed: {error}"));
    (owner, organization)
}

fn team_input(name: &str) -> TeamInput {
    TeamInput {
        name: name.to_owned(),
        description: Some("Builds the platform".to_owned()),
    }
}

fn entry(identifier: &str, role_name: Option<&str>) -> AddMemberEntry {
    AddMemberEntry {
        identifier: identifier.to_owned(),
        role_name: role_name.map(str::to_owned),
    }
}

async fn platform_team(store: &Arc<FakeStore>) -> (UserProfile, Organization, Team) {
    let (owner, organization) = seed_organization(store, "Acme Corp").await;
    let team = team_service(store)
        .create_team(owner.id, organization.id, team_input("Platform"))
        .await
        .unwrap_or_else(|error| panic!("team failed: {error}"));
    (owner, organization, team)
}

#[tokio::test]
async fn creator_owns_the_new_team() {
    let store = Arc::new(FakeStore::default());
    let (owner, _, team) = platform_team(&store).await;

    let owner_role = store
        .find_role_by_name_and_scope("Team Owner", team.scope())
        .await
        .ok()
        .flatten();
    let membership = store
        .find_membership(owner.id, team.scope())
        .await
        .ok()
        .flatten();

    assert_eq!(store.roles_in(team.scope()).await.len(), 4);
    assert_eq!(
        membership.map(|membership| membership.role_id),
        owner_role.map(|role| role.id)
    );
    assert_eq!(
        store.events().await.last().map(|event| event.action),
        Some(AuditAction::TeamCreated)
    );
}

#[tokio::test]
async fn team_creation_requires_team_create_in_the_organization() {
    let store = Arc::new(FakeStore::default());
    let (owner, organization) = seed_organization(&store, "Acme Corp").await;
    let viewer = store.add_user("viewer-user").await;
    let organizations = organization_service(&store);
    assert!(
        organizations
            .add_members(owner.id, organization.id, vec![entry("viewer-user", None)])
            .await
            .is_ok()
    );

    let result = team_service(&store)
        .create_team(viewer.id, organization.id, team_input("Platform"))
        .await;

    assert!(matches!(
        result,
        Err(AppError::Access(AccessError::Forbidden(name))) if name == "team:create"
    ));
}

#[tokio::test]
async fn team_names_are_unique_per_organization() {
    let store = Arc::new(FakeStore::default());
    let (owner, organization, _) = platform_team(&store).await;
    let (other_owner, other_organization) = seed_organization(&store, "Other Org").await;
    let service = team_service(&store);

    let duplicate = service
        .create_team(owner.id, organization.id, team_input("Platform"))
        .await;
    let elsewhere = service
        .create_team(other_owner.id, other_organization.id, team_input("Platform"))
        .await;

    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    assert!(elsewhere.is_ok());
}

#[tokio::test]
async fn teams_are_resolved_within_their_organization() {
    let store = Arc::new(FakeStore::default());
    let (_, _, team) = platform_team(&store).await;
    let (other_owner, other_organization) = seed_organization(&store, "Other Org").await;
    let service = team_service(&store);

    let foreign = service
        .get_team(other_owner.id, other_organization.id, team.id)
        .await;
    let unknown_organization = service
        .get_team(other_owner.id, OrganizationId::new(), team.id)
        .await;

    assert!(matches!(foreign, Err(AppError::NotFound(_))));
    assert!(matches!(unknown_organization, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn updates_are_authorized_in_the_team_scope() {
    let store = Arc::new(FakeStore::default());
    let (owner, organization, team) = platform_team(&store).await;
    let admin = store.add_user("admin-user").await;
    assert!(
        organization_service(&store)
            .add_members(
                owner.id,
                organization.id,
                vec![entry("admin-user", Some("Administrator"))],
            )
            .await
            .is_ok()
    );
    let service = team_service(&store);

    let outsider = service
        .update_team(admin.id, organization.id, team.id, team_input("Core Platform"))
        .await;
    let renamed = service
        .update_team(owner.id, organization.id, team.id, team_input("Core Platform"))
        .await;

    assert!(matches!(
        outsider,
        Err(AppError::Access(AccessError::ScopeMembershipNotFound { .. }))
    ));
    assert_eq!(
        renamed.map(|team| team.name).ok().as_deref(),
        Some("Core Platform")
    );
}

#[tokio::test]
async fn deleting_a_team_removes_its_roles() {
    let store = Arc::new(FakeStore::default());
    let (owner, organization, team) = platform_team(&store).await;
    let service = team_service(&store);

    assert!(
        service
            .delete_team(owner.id, organization.id, team.id)
            .await
            .is_ok()
    );

    assert!(store.roles_in(team.scope()).await.is_empty());
    assert!(matches!(
        service.get_team(owner.id, organization.id, team.id).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(store.roles_in(organization.scope()).await.len(), 5);
}

#[tokio::test]
async fn listing_includes_member_counts() {
    let store = Arc::new(FakeStore::default());
    let (owner, organization, team) = platform_team(&store).await;
    store.add_user("dev-user").await;
    let service = team_service(&store);
    assert!(
        service
            .add_members(owner.id, organization.id, team.id, vec![entry("dev-user", None)])
            .await
            .is_ok()
    );
    assert!(
        service
            .create_team(owner.id, organization.id, team_input("Design"))
            .await
            .is_ok()
    );

    let page = service
        .list_teams(owner.id, organization.id, PageRequest::default())
        .await
        .unwrap_or_else(|error| panic!("list failed: {error}"));

    let counts: Vec<(&str, u64)> = page
        .items
        .iter()
        .map(|summary| (summary.team.name.as_str(), summary.member_count))
        .collect();
    assert_eq!(counts, [("Design", 1), ("Platform", 2)]);
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn team_members_default_to_team_viewer_and_need_manage_members() {
    let store = Arc::new(FakeStore::default());
    let (owner, organization, team) = platform_team(&store).await;
    let dev = store.add_user("dev-user").await;
    store.add_user("new-user").await;
    let service = team_service(&store);

    let outcomes = service
        .add_members(owner.id, organization.id, team.id, vec![entry("dev-user", None)])
        .await
        .unwrap_or_default();
    assert!(matches!(
        outcomes.as_slice(),
        [MemberOutcome::Added { member, .. }] if member.role_name == "Team Viewer"
    ));

    let denied = service
        .add_members(dev.id, organization.id, team.id, vec![entry("new-user", None)])
        .await;
    assert!(matches!(
        denied,
        Err(AppError::Access(AccessError::Forbidden(name))) if name == "team:manage_members"
    ));

    assert!(
        service
            .remove_member(owner.id, organization.id, team.id, dev.id)
            .await
            .is_ok()
    );
    let members = service
        .list_members(owner.id, organization.id, team.id, PageRequest::default())
        .await
        .unwrap_or_else(|error| panic!("list failed: {error}"));
    assert_eq!(members.total, 1);
    assert_eq!(members.items[0].user_id, owner.id);
}

#[tokio::test]
async fn failed_setup_removes_the_new_team() {
    let store = Arc::new(FakeStore::default());
    let (owner, organization) = seed_organization(&store, "Acme Corp").await;
    let broken = team_service_with(&store, registry_with_unknown_permission());

    let result = broken
        .create_team(owner.id, organization.id, team_input("Platform"))
        .await;

    assert!(matches!(
        result,
        Err(AppError::Access(AccessError::PermissionNotFound(name))) if name == "billing:refund"
    ));
    assert_eq!(store.organization_and_team_counts().await, (1, 0));

    let retried = team_service(&store)
        .create_team(owner.id, organization.id, team_input("Platform"))
        .await;
    assert!(retried.is_ok());
}
