use serde::{Deserialize, Serialize};
use taskhub_application::{ChangePasswordParams, UpdateProfileParams};

/// Partial profile update for the signed-in user.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<UpdateProfileRequest> for UpdateProfileParams {
    fn from(value: UpdateProfileRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            is_active: value.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

impl From<ChangePasswordRequest> for ChangePasswordParams {
    fn from(value: ChangePasswordRequest) -> Self {
        Self {
            password: value.password,
            new_password: value.new_password,
            confirm_new_password: value.confirm_new_password,
        }
    }
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
