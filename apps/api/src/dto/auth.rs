use serde::{Deserialize, Serialize};
use taskhub_application::{IssuedToken, RegisterParams};
use taskhub_domain::UserProfile;

/// Incoming payload for account registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl From<RegisterRequest> for RegisterParams {
    fn from(value: RegisterRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            password: value.password,
        }
    }
}

/// Incoming payload for token issuance.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Issued bearer token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: String,
}

impl From<IssuedToken> for TokenResponse {
    fn from(value: IssuedToken) -> Self {
        Self {
            access_token: value.access_token,
            token_type: "bearer",
            expires_at: value.expires_at.to_rfc3339(),
        }
    }
}

/// API representation of a user profile.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

impl From<UserProfile> for UserResponse {
    fn from(value: UserProfile) -> Self {
        Self {
            id: value.id.to_string(),
            full_name: value.full_name(),
            username: value.username,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
        }
    }
}
