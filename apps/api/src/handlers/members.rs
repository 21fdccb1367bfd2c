use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use taskhub_core::{Page, PageRequest};
use taskhub_domain::{OrganizationId, RoleId, TeamId, UserId, UserProfile};
use uuid::Uuid;

use crate::dto::{
    AddMembersRequest, MemberOutcomeResponse, MemberResponseDto, PageQuery,
    UpdateMemberRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod team;

pub use team::{
    add_team_members_handler, list_team_members_handler, remove_team_member_handler,
    update_team_member_role_handler,
};

pub async fn list_organization_members_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path(organization_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<MemberResponseDto>>> {
    let page = state
        .organization_service
        .list_members(
            user.id,
            OrganizationId::from_uuid(organization_id),
            PageRequest::try_from(query)?,
        )
        .await?
        .map(MemberResponseDto::from);

    Ok(Json(page))
}

pub async fn add_organization_members_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path(organization_id): Path<Uuid>,
    Json(payload): Json<AddMembersRequest>,
) -> ApiResult<Json<Vec<MemberOutcomeResponse>>> {
    let outcomes = state
        .organization_service
        .add_members(
            user.id,
            OrganizationId::from_uuid(organization_id),
            payload.into(),
        )
        .await?;

    Ok(Json(into_outcome_responses(outcomes)))
}

pub async fn update_organization_member_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path((organization_id, user_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateMemberRoleRequest>,
) -> ApiResult<Json<MemberResponseDto>> {
    let member = state
        .organization_service
        .update_member_role(
            user.id,
            OrganizationId::from_uuid(organization_id),
            UserId::from_uuid(user_id),
            RoleId::from_uuid(payload.role_id),
        )
        .await?;

    Ok(Json(MemberResponseDto::from(member)))
}

pub async fn remove_organization_member_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path((organization_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .organization_service
        .remove_member(
            user.id,
            OrganizationId::from_uuid(organization_id),
            UserId::from_uuid(user_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn into_outcome_responses(
    outcomes: Vec<taskhub_application::MemberOutcome>,
) -> Vec<MemberOutcomeResponse> {
    outcomes
        .into_iter()
        .map(MemberOutcomeResponse::from)
        .collect()
}
