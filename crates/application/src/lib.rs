//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod auth_service;
mod authorization_service;
mod directory_ports;
mod membership_service;
mod organization_service;
mod role_bootstrap_service;
mod team_service;
mod user_ports;

#[cfg(test)]
mod test_support;

pub use access_ports::{AccessControlRepository, AuditEvent, AuditRepository};
pub use auth_service::{
    AuthService, ChangePasswordParams, IssuedToken, RegisterParams, UpdateProfileParams,
};
pub use authorization_service::AuthorizationService;
pub use directory_ports::{OrganizationInput, OrganizationRepository, TeamInput, TeamRepository};
pub use membership_service::{
    AddMemberEntry, MemberOutcome, MemberResponse, MembershipService,
};
pub use organization_service::{OrganizationDetails, OrganizationService, RoleSummary};
pub use role_bootstrap_service::{BootstrapReport, RoleBootstrapService};
pub use team_service::{TeamService, TeamSummary};
pub use user_ports::{
    AccessTokenRepository, NewUser, PasswordHasher, ProfileUpdate, UserRecord, UserRepository,
};
