use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use taskhub_application::{AccessControlRepository, OrganizationRepository, TeamRepository};
use taskhub_core::{AppError, PageRequest};
use taskhub_domain::{NewRole, OrganizationDraft, TeamDraft, UserId};
use uuid::Uuid;

use super::PostgresDirectoryRepository;
use crate::PostgresAccessControlRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres directory tests: {error}");
    }

    Some(pool)
}

async fn ensure_user(pool: &PgPool) -> UserId {
    let user_id = UserId::new();
    let username = format!("owner-{}", user_id.as_uuid().simple());
    let insert = sqlx::query(
        r#"
            INSERT INTO users (id, username, email, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, 'Org', 'Owner', 'hash')
            "#,
    )
    .bind(user_id.as_uuid())
    .bind(username.as_str())
    .bind(format!("{username}@example.com"))
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    user_id
}

fn unique_organization_name() -> String {
    format!("Org {}", &Uuid::new_v4().simple().to_string()[..12])
}

#[tokio::test]
async fn organization_names_are_globally_unique() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresDirectoryRepository::new(pool.clone());
    let owner = ensure_user(&pool).await;
    let Ok(draft) = OrganizationDraft::new(unique_organization_name(), None) else {
        panic!("draft should be valid");
    };

    assert!(repository.create_organization(&draft, owner).await.is_ok());
    let duplicate = repository.create_organization(&draft, owner).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn team_names_are_unique_per_organization_and_listed_by_name() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresDirectoryRepository::new(pool.clone());
    let owner = ensure_user(&pool).await;
    let Ok(draft) = OrganizationDraft::new(unique_organization_name(), None) else {
        panic!("draft should be valid");
    };
    let Ok(organization) = repository.create_organization(&draft, owner).await else {
        panic!("organization should be created");
    };

    for name in ["Platform", "Design"] {
        let Ok(team) = TeamDraft::new(name, None) else {
            panic!("team draft should be valid");
        };
        assert!(repository.create_team(organization.id, &team, owner).await.is_ok());
    }

    let Ok(duplicate) = TeamDraft::new("Design", Some("again".to_owned())) else {
        panic!("team draft should be valid");
    };
    let result = repository.create_team(organization.id, &duplicate, owner).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let teams = repository
        .list_teams(organization.id, PageRequest::default())
        .await;
    assert_eq!(
        teams
            .ok()
            .map(|teams| teams.into_iter().map(|team| team.name).collect::<Vec<_>>()),
        Some(vec!["Design".to_owned(), "Platform".to_owned()])
    );
    assert_eq!(repository.count_teams(organization.id).await.ok(), Some(2));
}

#[tokio::test]
async fn deleting_an_organization_removes_team_roles_and_memberships() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresDirectoryRepository::new(pool.clone());
    let access = PostgresAccessControlRepository::new(pool.clone());
    let owner = ensure_user(&pool).await;
    let Ok(draft) = OrganizationDraft::new(unique_organization_name(), None) else {
        panic!("draft should be valid");
    };
    let Ok(organization) = repository.create_organization(&draft, owner).await else {
        panic!("organization should be created");
    };
    let Ok(team_draft) = TeamDraft::new("Platform", None) else {
        panic!("team draft should be valid");
    };
    let Ok(team) = repository.create_team(organization.id, &team_draft, owner).await else {
        panic!("team should be created");
    };

    for scope in [organization.scope(), team.scope()] {
        let role = access
            .create_role(NewRole {
                name: "Owner".to_owned(),
                description: String::new(),
                is_system_role: true,
                scope,
            })
            .await;
        let Ok(role) = role else {
            panic!("role should be created");
        };
        assert!(access.create_membership(owner, scope, role.id).await.is_ok());
    }

    assert_eq!(
        repository.delete_organization(organization.id).await.ok(),
        Some(true)
    );

    assert!(matches!(repository.find_team(team.id).await, Ok(None)));
    assert!(matches!(
        access.find_membership(owner, team.scope()).await,
        Ok(None)
    ));
    assert_eq!(
        access
            .list_roles_for_scope(organization.scope())
            .await
            .ok()
            .map(|roles| roles.len()),
        Some(0)
    );
    assert_eq!(
        repository.count_organizations_for_user(owner).await.ok(),
        Some(0)
    );
}
