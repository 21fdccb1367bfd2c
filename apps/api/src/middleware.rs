use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use taskhub_core::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// Raw bearer token of the current request, kept for logout.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = bearer_token(&request)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let user = state.auth_service.authenticate(token.as_str()).await?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(BearerToken(token));
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_owned())
}
