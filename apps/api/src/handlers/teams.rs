use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use taskhub_core::{Page, PageRequest};
use taskhub_domain::{OrganizationId, TeamId, UserProfile};
use uuid::Uuid;

use crate::dto::{PageQuery, TeamRequest, TeamResponse, TeamSummaryResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_teams_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path(organization_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<TeamSummaryResponse>>> {
    let page = state
        .team_service
        .list_teams(
            user.id,
            OrganizationId::from_uuid(organization_id),
            PageRequest::try_from(query)?,
        )
        .await?
        .map(TeamSummaryResponse::from);

    Ok(Json(page))
}

pub async fn create_team_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path(organization_id): Path<Uuid>,
    Json(payload): Json<TeamRequest>,
) -> ApiResult<(StatusCode, Json<TeamResponse>)> {
    let team = state
        .team_service
        .create_team(
            user.id,
            OrganizationId::from_uuid(organization_id),
            payload.into(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(team))))
}

pub async fn get_team_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path((organization_id, team_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<TeamSummaryResponse>> {
    let summary = state
        .team_service
        .get_team(
            user.id,
            OrganizationId::from_uuid(organization_id),
            TeamId::from_uuid(team_id),
        )
        .await?;

    Ok(Json(TeamSummaryResponse::from(summary)))
}

pub async fn update_team_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path((organization_id, team_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<TeamRequest>,
) -> ApiResult<Json<TeamResponse>> {
    let team = state
        .team_service
        .update_team(
            user.id,
            OrganizationId::from_uuid(organization_id),
            TeamId::from_uuid(team_id),
            payload.into(),
        )
        .await?;

    Ok(Json(TeamResponse::from(team)))
}

pub async fn delete_team_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path((organization_id, team_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .team_service
        .delete_team(
            user.id,
            OrganizationId::from_uuid(organization_id),
            TeamId::from_uuid(team_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
