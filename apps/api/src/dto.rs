mod auth;
mod common;
mod directory;
mod members;
mod users;

pub use auth::{RegisterRequest, TokenRequest, TokenResponse, UserResponse};
pub use common::{HealthResponse, PageQuery, PermissionResponse};
pub use directory::{
    OrganizationDetailsResponse, OrganizationRequest, OrganizationResponse, RoleResponse,
    TeamRequest, TeamResponse, TeamSummaryResponse,
};
pub use members::{
    AddMembersRequest, MemberOutcomeResponse, MemberResponseDto, UpdateMemberRoleRequest,
};
pub use users::{ChangePasswordRequest, MessageResponse, UpdateProfileRequest};
