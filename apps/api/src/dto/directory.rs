use serde::{Deserialize, Serialize};
use taskhub_application::{
    OrganizationDetails, OrganizationInput, RoleSummary, TeamInput, TeamSummary,
};
use taskhub_domain::{Organization, Team};

use super::UserResponse;

/// Incoming payload for organization creation and replacement.
#[derive(Debug, Deserialize)]
pub struct OrganizationRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<OrganizationRequest> for OrganizationInput {
    fn from(value: OrganizationRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
        }
    }
}

/// API representation of an organization.
#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Organization> for OrganizationResponse {
    fn from(value: Organization) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            description: value.description,
            owner_id: value.owner_id.to_string(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Organization with its owner profile and member count.
#[derive(Debug, Serialize)]
pub struct OrganizationDetailsResponse {
    #[serde(flatten)]
    pub organization: OrganizationResponse,
    pub owner: UserResponse,
    pub member_count: u64,
}

impl From<OrganizationDetails> for OrganizationDetailsResponse {
    fn from(value: OrganizationDetails) -> Self {
        Self {
            organization: value.organization.into(),
            owner: value.owner.into(),
            member_count: value.member_count,
        }
    }
}

/// Incoming payload for team creation and replacement.
#[derive(Debug, Deserialize)]
pub struct TeamRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<TeamRequest> for TeamInput {
    fn from(value: TeamRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
        }
    }
}

/// API representation of a team.
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Team> for TeamResponse {
    fn from(value: Team) -> Self {
        Self {
            id: value.id.to_string(),
            organization_id: value.organization_id.to_string(),
            name: value.name,
            description: value.description,
            owner_id: value.owner_id.to_string(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Team with its member count.
#[derive(Debug, Serialize)]
pub struct TeamSummaryResponse {
    #[serde(flatten)]
    pub team: TeamResponse,
    pub member_count: u64,
}

impl From<TeamSummary> for TeamSummaryResponse {
    fn from(value: TeamSummary) -> Self {
        Self {
            team: value.team.into(),
            member_count: value.member_count,
        }
    }
}

/// API representation of a scoped role.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_system_role: bool,
    pub permissions: Vec<String>,
}

impl From<RoleSummary> for RoleResponse {
    fn from(value: RoleSummary) -> Self {
        Self {
            id: value.role.id.to_string(),
            name: value.role.name,
            description: value.role.description,
            is_system_role: value.role.is_system_role,
            permissions: value.permission_names,
        }
    }
}
