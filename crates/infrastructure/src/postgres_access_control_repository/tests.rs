use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use taskhub_application::AccessControlRepository;
use taskhub_core::{AppError, PageRequest, Scope};
use taskhub_domain::{NewRole, UserId};
use uuid::Uuid;

use super::PostgresAccessControlRepository;

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
        panic!("failed to run migrations for postgres access control tests: {error}");
    }

    Some(pool)
}

async fn ensure_user(pool: &PgPool, username: &str) -> UserId {
    let user_id = UserId::new();
    let unique = format!("{username}-{}", &user_id.to_string()[..8]);
    let insert = sqlx::query(
        r#"
            INSERT INTO users (id, username, email, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, 'Test', 'User', 'hash')
            "#,
    )
    .bind(user_id.as_uuid())
    .bind(unique.as_str())
    .bind(format!("{unique}@example.com"))
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    user_id
}

fn system_role(name: &str, scope: Scope) -> NewRole {
    NewRole {
        name: name.to_owned(),
        description: String::new(),
        is_system_role: true,
        scope,
    }
}

#[tokio::test]
async fn duplicate_roles_in_one_scope_conflict_but_other_scopes_do_not() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAccessControlRepository::new(pool);
    let scope = Scope::organization(Uuid::new_v4());
    let other_scope = Scope::team(scope.id());

    let created = repository.create_role(system_role("Owner", scope)).await;
    assert!(created.is_ok());

    let duplicate = repository.create_role(system_role("Owner", scope)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let other = repository.create_role(system_role("Owner", other_scope)).await;
    assert!(other.is_ok());

    let found = repository.find_role_by_name_and_scope("Owner", other_scope).await;
    assert_eq!(
        found.ok().flatten().map(|role| role.scope),
        Some(other_scope)
    );
}

#[tokio::test]
async fn permission_links_are_idempotent_and_listed_by_name() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAccessControlRepository::new(pool);
    let suffix = Uuid::new_v4().simple().to_string();
    let write = repository
        .create_permission(format!("test:write-{suffix}").as_str(), "write")
        .await;
    let read = repository
        .create_permission(format!("test:read-{suffix}").as_str(), "read")
        .await;
    let (Ok(write), Ok(read)) = (write, read) else {
        panic!("permissions should be created");
    };

    let duplicate = repository.create_permission(write.name.as_str(), "again").await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let role = repository
        .create_role(system_role("Editor", Scope::organization(Uuid::new_v4())))
        .await;
    let Ok(role) = role else {
        panic!("role should be created");
    };

    for permission in [&write, &read, &write] {
        let link = repository
            .create_role_permission_link(role.id, permission.id)
            .await;
        assert!(link.is_ok());
    }

    let names = repository.list_role_permission_names(role.id).await;
    assert_eq!(names.ok(), Some(vec![read.name.clone(), write.name.clone()]));

    let link = repository.find_role_permission_link(role.id, read.id).await;
    assert!(matches!(link, Ok(Some(_))));
}

#[tokio::test]
async fn memberships_are_unique_per_scope_and_paginate_in_join_order() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAccessControlRepository::new(pool.clone());
    let scope = Scope::organization(Uuid::new_v4());
    let Ok(role) = repository.create_role(system_role("Viewer", scope)).await else {
        panic!("role should be created");
    };

    let first = ensure_user(&pool, "first").await;
    let second = ensure_user(&pool, "second").await;

    assert!(repository.create_membership(first, scope, role.id).await.is_ok());
    assert!(repository.create_membership(second, scope, role.id).await.is_ok());

    let duplicate = repository.create_membership(first, scope, role.id).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    assert_eq!(repository.count_memberships(scope).await.ok(), Some(2));

    let page = PageRequest::new(2, 1).unwrap_or_default();
    let members = repository.list_memberships(scope, page).await;
    assert_eq!(
        members
            .ok()
            .map(|members| members.iter().map(|member| member.user_id).collect::<Vec<_>>()),
        Some(vec![second])
    );

    assert_eq!(repository.delete_membership(first, scope).await.ok(), Some(true));
    assert_eq!(repository.delete_membership(first, scope).await.ok(), Some(false));
}

#[tokio::test]
async fn users_resolve_by_username_or_id() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAccessControlRepository::new(pool.clone());
    let user_id = ensure_user(&pool, "lookup").await;

    let by_id = repository
        .find_user_by_identifier(user_id.to_string().as_str())
        .await;
    let Ok(Some(profile)) = by_id else {
        panic!("user should resolve by id");
    };
    assert_eq!(profile.id, user_id);

    let by_name = repository
        .find_user_by_identifier(profile.username.as_str())
        .await;
    assert_eq!(by_name.ok().flatten().map(|found| found.id), Some(user_id));

    let missing = repository.find_user_by_identifier("nobody-here").await;
    assert!(matches!(missing, Ok(None)));
}
