use axum::Json;
use axum::extract::{Extension, Path, State};
use taskhub_domain::{UserId, UserProfile};
use uuid::Uuid;

use crate::dto::{ChangePasswordRequest, MessageResponse, UpdateProfileRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

const PASSWORD_UPDATED: &str = "Password updated successfully.";

pub async fn update_me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    let updated = state
        .auth_service
        .update_profile(user.id, payload.into())
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .auth_service
        .change_password(user.id, payload.into())
        .await?;

    Ok(Json(MessageResponse {
        message: PASSWORD_UPDATED,
    }))
}

pub async fn user_profile_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let profile = state
        .auth_service
        .get_user_profile(UserId::from_uuid(user_id))
        .await?;

    Ok(Json(UserResponse::from(profile)))
}
