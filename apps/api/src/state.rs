use taskhub_application::{AuthService, OrganizationService, TeamService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub organization_service: OrganizationService,
    pub team_service: TeamService,
}
