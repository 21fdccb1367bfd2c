use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use taskhub_core::{AccessError, AppError};
use tracing::error;

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<AccessError> for ApiError {
    fn from(value: AccessError) -> Self {
        Self(AppError::Access(value))
    }
}

pub fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Access(access) => match access {
            AccessError::ScopeMembershipNotFound { .. } | AccessError::Forbidden(_) => {
                StatusCode::FORBIDDEN
            }
            AccessError::RoleNotFound { .. } | AccessError::UserNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AccessError::AlreadyMember { .. } => StatusCode::CONFLICT,
            AccessError::PermissionNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        let payload = Json(ErrorResponse {
            message: self.0.to_string(),
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use taskhub_core::{AccessError, AppError, Scope};
    use uuid::Uuid;

    use super::status_for;

    #[test]
    fn access_failures_map_to_distinct_statuses() {
        let scope = Scope::organization(Uuid::new_v4());
        let cases = [
            (
                AccessError::ScopeMembershipNotFound {
                    user_id: Uuid::new_v4(),
                    scope,
                },
                StatusCode::FORBIDDEN,
            ),
            (
                AccessError::Forbidden("team:create".to_owned()),
                StatusCode::FORBIDDEN,
            ),
            (
                AccessError::RoleNotFound {
                    role: "Ghost".to_owned(),
                    scope,
                },
                StatusCode::NOT_FOUND,
            ),
            (
                AccessError::UserNotFound("nobody".to_owned()),
                StatusCode::NOT_FOUND,
            ),
            (
                AccessError::AlreadyMember {
                    user_id: Uuid::new_v4(),
                    scope,
                },
                StatusCode::CONFLICT,
            ),
            (
                AccessError::PermissionNotFound("team:create".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(status_for(&AppError::Access(error)), status);
        }
    }

    #[test]
    fn generic_failures_keep_their_statuses() {
        assert_eq!(
            status_for(&AppError::Validation("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AppError::Unauthorized("no".to_owned())),
            StatusCode::UNAUTHORIZED
        );
    }
}
