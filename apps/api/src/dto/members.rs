use serde::{Deserialize, Serialize};
use taskhub_application::{AddMemberEntry, MemberOutcome, MemberResponse};
use uuid::Uuid;

/// One requested member in a batch addition.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub identifier: String,
    #[serde(default)]
    pub role_name: Option<String>,
}

/// Incoming payload for batch member addition.
#[derive(Debug, Deserialize)]
pub struct AddMembersRequest {
    pub members: Vec<AddMemberRequest>,
}

impl From<AddMembersRequest> for Vec<AddMemberEntry> {
    fn from(value: AddMembersRequest) -> Self {
        value
            .members
            .into_iter()
            .map(|member| AddMemberEntry {
                identifier: member.identifier,
                role_name: member.role_name,
            })
            .collect()
    }
}

/// Incoming payload for member role changes.
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role_id: Uuid,
}

// Every stored membership is active.
const ACTIVE_MEMBER_STATUS: &str = "active";

/// API representation of a membership.
#[derive(Debug, Serialize)]
pub struct MemberResponseDto {
    pub user_id: String,
    pub scope_kind: &'static str,
    pub scope_id: String,
    pub role_id: String,
    pub role_name: String,
    pub username: String,
    pub user_email: String,
    pub user_full_name: String,
    pub status: &'static str,
    pub joined_at: String,
}

impl From<MemberResponse> for MemberResponseDto {
    fn from(value: MemberResponse) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            scope_kind: value.scope.kind().as_str(),
            scope_id: value.scope.id().to_string(),
            role_id: value.role_id.to_string(),
            role_name: value.role_name,
            username: value.username,
            user_email: value.user_email,
            user_full_name: value.user_full_name,
            status: ACTIVE_MEMBER_STATUS,
            joined_at: value.joined_at.to_rfc3339(),
        }
    }
}

/// Per-entry result of a batch addition.
#[derive(Debug, Serialize)]
pub struct MemberOutcomeResponse {
    pub identifier: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberResponseDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<MemberOutcome> for MemberOutcomeResponse {
    fn from(value: MemberOutcome) -> Self {
        match value {
            MemberOutcome::Added { identifier, member } => Self {
                identifier,
                status: "added",
                member: Some(member.into()),
                error: None,
            },
            MemberOutcome::Failed { identifier, error } => Self {
                identifier,
                status: "failed",
                member: None,
                error: Some(error.to_string()),
            },
        }
    }
}
