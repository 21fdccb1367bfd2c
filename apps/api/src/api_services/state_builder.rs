use std::sync::Arc;

use sqlx::PgPool;
use taskhub_application::{
    AccessControlRepository, AccessTokenRepository, AuditRepository, AuthService,
    AuthorizationService, MembershipService, OrganizationRepository, OrganizationService,
    PasswordHasher, RoleBootstrapService, TeamRepository, TeamService, UserRepository,
};
use taskhub_core::AppResult;
use taskhub_domain::RoleTemplateRegistry;
use taskhub_infrastructure::{
    InMemoryAccessRepository, PostgresAccessControlRepository, PostgresAccessTokenRepository,
    PostgresDirectoryRepository, PostgresUserRepository, TracingAuditRepository,
};

use crate::state::AppState;

/// Storage adapters behind every port the services use.
pub struct StoragePorts {
    pub access: Arc<dyn AccessControlRepository>,
    pub organizations: Arc<dyn OrganizationRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn AccessTokenRepository>,
}

impl StoragePorts {
    pub fn postgres(pool: PgPool) -> Self {
        let directory = Arc::new(PostgresDirectoryRepository::new(pool.clone()));

        Self {
            access: Arc::new(PostgresAccessControlRepository::new(pool.clone())),
            organizations: directory.clone(),
            teams: directory,
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            tokens: Arc::new(PostgresAccessTokenRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryAccessRepository::new());

        Self {
            access: store.clone(),
            organizations: store.clone(),
            teams: store.clone(),
            users: store.clone(),
            tokens: store,
        }
    }
}

pub fn build_app_state(
    ports: StoragePorts,
    password_hasher: Arc<dyn PasswordHasher>,
    token_ttl: chrono::Duration,
) -> AppResult<AppState> {
    let audit_repository: Arc<dyn AuditRepository> = Arc::new(TracingAuditRepository::new());
    let registry = Arc::new(RoleTemplateRegistry::standard()?);

    let authorization_service = AuthorizationService::new(ports.access.clone());
    let bootstrap_service = RoleBootstrapService::new(ports.access.clone(), registry);
    let membership_service = MembershipService::new(ports.access.clone(), audit_repository.clone());

    Ok(AppState {
        auth_service: AuthService::new(ports.users, ports.tokens, password_hasher, token_ttl),
        organization_service: OrganizationService::new(
            ports.organizations.clone(),
            ports.access.clone(),
            audit_repository.clone(),
            authorization_service.clone(),
            bootstrap_service.clone(),
            membership_service.clone(),
        ),
        team_service: TeamService::new(
            ports.teams,
            ports.organizations,
            ports.access,
            audit_repository,
            authorization_service,
            bootstrap_service,
            membership_service,
        ),
    })
}
