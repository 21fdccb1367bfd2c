//! PostgreSQL-backed organization and team directory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskhub_application::{OrganizationRepository, TeamRepository};
use taskhub_core::{AppError, AppResult, PageRequest};
use taskhub_domain::{
    Organization, OrganizationDraft, OrganizationId, Team, TeamDraft, TeamId, UserId,
};

mod organizations;
mod teams;

/// PostgreSQL implementation of the organization and team repository ports.
#[derive(Clone)]
pub struct PostgresDirectoryRepository {
    pool: PgPool,
}

impl PostgresDirectoryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrganizationRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Self {
            id: OrganizationId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            owner_id: UserId::from_uuid(row.owner_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TeamRow {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    description: Option<String>,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Self {
            id: TeamId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            organization_id: OrganizationId::from_uuid(row.organization_id),
            owner_id: UserId::from_uuid(row.owner_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn name_conflict_or_internal(error: sqlx::Error, name: &str, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("name '{name}' is already taken"));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

fn page_bounds(page: PageRequest) -> (i64, i64) {
    (
        i64::try_from(page.limit()).unwrap_or(i64::MAX),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}

#[async_trait]
impl OrganizationRepository for PostgresDirectoryRepository {
    async fn create_organization(
        &self,
        draft: &OrganizationDraft,
        owner_id: UserId,
    ) -> AppResult<Organization> {
        self.create_organization_impl(draft, owner_id).await
    }

    async fn find_organization(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        self.find_organization_impl(organization_id).await
    }

    async fn list_organizations_for_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> AppResult<Vec<Organization>> {
        self.list_organizations_for_user_impl(user_id, page).await
    }

    async fn count_organizations_for_user(&self, user_id: UserId) -> AppResult<u64> {
        self.count_organizations_for_user_impl(user_id).await
    }

    async fn update_organization(
        &self,
        organization_id: OrganizationId,
        draft: &OrganizationDraft,
    ) -> AppResult<Option<Organization>> {
        self.update_organization_impl(organization_id, draft).await
    }

    async fn delete_organization(&self, organization_id: OrganizationId) -> AppResult<bool> {
        self.delete_organization_impl(organization_id).await
    }
}

#[async_trait]
impl TeamRepository for PostgresDirectoryRepository {
    async fn create_team(
        &self,
        organization_id: OrganizationId,
        draft: &TeamDraft,
        owner_id: UserId,
    ) -> AppResult<Team> {
        self.create_team_impl(organization_id, draft, owner_id).await
    }

    async fn find_team(&self, team_id: TeamId) -> AppResult<Option<Team>> {
        self.find_team_impl(team_id).await
    }

    async fn list_teams(
        &self,
        organization_id: OrganizationId,
        page: PageRequest,
    ) -> AppResult<Vec<Team>> {
        self.list_teams_impl(organization_id, page).await
    }

    async fn count_teams(&self, organization_id: OrganizationId) -> AppResult<u64> {
        self.count_teams_impl(organization_id).await
    }

    async fn update_team(&self, team_id: TeamId, draft: &TeamDraft) -> AppResult<Option<Team>> {
        self.update_team_impl(team_id, draft).await
    }

    async fn delete_team(&self, team_id: TeamId) -> AppResult<bool> {
        self.delete_team_impl(team_id).await
    }
}

#[cfg(test)]
mod tests;
