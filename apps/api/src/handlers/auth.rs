use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use taskhub_domain::UserProfile;

use crate::dto::{RegisterRequest, TokenRequest, TokenResponse, UserResponse};
use crate::error::ApiResult;
use crate::middleware::BearerToken;
use crate::state::AppState;

pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state.auth_service.register(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn token_handler(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.username.as_str(), payload.password.as_str())
        .await?;

    Ok(Json(TokenResponse::from(token)))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
) -> ApiResult<StatusCode> {
    state.auth_service.logout(token.0.as_str()).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(Extension(user): Extension<UserProfile>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
