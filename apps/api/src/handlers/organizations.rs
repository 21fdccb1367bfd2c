use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use taskhub_core::{Page, PageRequest};
use taskhub_domain::{OrganizationId, UserProfile};
use uuid::Uuid;

use crate::dto::{
    OrganizationDetailsResponse, OrganizationRequest, OrganizationResponse, PageQuery,
    RoleResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_organizations_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<OrganizationResponse>>> {
    let page = state
        .organization_service
        .list_organizations_for_user(user.id, PageRequest::try_from(query)?)
        .await?
        .map(OrganizationResponse::from);

    Ok(Json(page))
}

pub async fn create_organization_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Json(payload): Json<OrganizationRequest>,
) -> ApiResult<(StatusCode, Json<OrganizationResponse>)> {
    let organization = state
        .organization_service
        .create_organization(user.id, payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrganizationResponse::from(organization)),
    ))
}

pub async fn get_organization_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path(organization_id): Path<Uuid>,
) -> ApiResult<Json<OrganizationDetailsResponse>> {
    let details = state
        .organization_service
        .get_organization(user.id, OrganizationId::from_uuid(organization_id))
        .await?;

    Ok(Json(OrganizationDetailsResponse::from(details)))
}

pub async fn update_organization_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path(organization_id): Path<Uuid>,
    Json(payload): Json<OrganizationRequest>,
) -> ApiResult<Json<OrganizationResponse>> {
    let organization = state
        .organization_service
        .update_organization(
            user.id,
            OrganizationId::from_uuid(organization_id),
            payload.into(),
        )
        .await?;

    Ok(Json(OrganizationResponse::from(organization)))
}

pub async fn delete_organization_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path(organization_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .organization_service
        .delete_organization(user.id, OrganizationId::from_uuid(organization_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_organization_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path(organization_id): Path<Uuid>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .organization_service
        .list_roles(user.id, OrganizationId::from_uuid(organization_id))
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}
