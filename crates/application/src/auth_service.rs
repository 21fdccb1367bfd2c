//! Registration, password login and bearer token resolution.
//!
//! Login failures share one generic message so callers cannot tell which
//! usernames exist.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use taskhub_core::{AppError, AppResult};
use taskhub_domain::{
    EmailAddress, UserId, UserProfile, Username, validate_password, validate_person_name,
};
use tracing::info;

use crate::{AccessTokenRepository, NewUser, PasswordHasher, ProfileUpdate, UserRepository};

mod token_crypto;

const INVALID_CREDENTIALS: &str = "invalid username or password";
const INVALID_TOKEN: &str = "invalid or expired access token";
const INCORRECT_CURRENT_PASSWORD: &str = "Current password is incorrect.";
const NEW_PASSWORDS_DIFFER: &str = "New passwords do not match.";

/// Parameters for user registration.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    /// Unique login name.
    pub username: String,
    /// Email address for the new account.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Plaintext password (validated against OWASP rules).
    pub password: String,
}

/// Profile fields a user may change on their own account.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileParams {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Password change request for the signed-in user.
#[derive(Debug, Clone)]
pub struct ChangePasswordParams {
    /// Current plaintext password.
    pub password: String,
    /// Replacement password.
    pub new_password: String,
    /// Must equal `new_password`.
    pub confirm_new_password: String,
}

/// Bearer token handed to a client after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Raw token value. Only its digest is stored.
    pub access_token: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

/// Application service for user registration and bearer authentication.
#[derive(Clone)]
pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    token_repository: Arc<dyn AccessTokenRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_ttl: Duration,
}

impl AuthService {
    /// Creates a new auth service issuing tokens valid for `token_ttl`.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_repository: Arc<dyn AccessTokenRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            password_hasher,
            token_ttl,
        }
    }

    /// Registers a new user.
    pub async fn register(&self, params: RegisterParams) -> AppResult<UserProfile> {
        let username = Username::new(params.username)?;
        let email = EmailAddress::new(params.email)?;
        let first_name = validate_person_name("first name", &params.first_name)?;
        let last_name = validate_person_name("last name", &params.last_name)?;
        validate_password(&params.password)?;

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let user = self
            .user_repository
            .create(NewUser {
                username,
                email,
                first_name,
                last_name,
                password_hash,
            })
            .await?;

        info!(user_id = %user.profile.id, username = %user.profile.username, "user registered");
        Ok(user.profile)
    }

    /// Verifies credentials and issues a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<IssuedToken> {
        let Some(user) = self.user_repository.find_by_username(username).await? else {
            // Hash anyway so unknown usernames cost the same as wrong passwords.
            let _ = self.password_hasher.hash_password(password);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        };

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;
        if !password_valid || !user.is_active {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        }

        let now = Utc::now();
        self.user_repository
            .record_login(user.profile.id, now)
            .await?;

        let (access_token, token_hash) = token_crypto::generate_token()?;
        let expires_at = now + self.token_ttl;
        self.token_repository
            .store_token(&token_hash, user.profile.id, expires_at)
            .await?;

        info!(user_id = %user.profile.id, "access token issued");
        Ok(IssuedToken {
            access_token,
            expires_at,
        })
    }

    /// Resolves a raw bearer token to the active user it was issued to.
    pub async fn authenticate(&self, raw_token: &str) -> AppResult<UserProfile> {
        let token_hash = token_crypto::hash_token(raw_token);
        let user_id = self
            .token_repository
            .find_active_token(&token_hash, Utc::now())
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_TOKEN.to_owned()))?;

        self.user_repository
            .find_by_id(user_id)
            .await?
            .filter(|user| user.is_active)
            .map(|user| user.profile)
            .ok_or_else(|| AppError::Unauthorized(INVALID_TOKEN.to_owned()))
    }

    /// Returns the profile of any existing user.
    pub async fn get_user_profile(&self, user_id: UserId) -> AppResult<UserProfile> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .map(|user| user.profile)
            .ok_or_else(|| Self::user_not_found(user_id))
    }

    /// Applies the given profile changes to the user's own account.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        params: UpdateProfileParams,
    ) -> AppResult<UserProfile> {
        let update = ProfileUpdate {
            first_name: params
                .first_name
                .map(|name| validate_person_name("first name", &name))
                .transpose()?,
            last_name: params
                .last_name
                .map(|name| validate_person_name("last name", &name))
                .transpose()?,
            email: params.email.map(EmailAddress::new).transpose()?,
            is_active: params.is_active,
        };

        let user = self
            .user_repository
            .update_profile(user_id, &update)
            .await?
            .ok_or_else(|| Self::user_not_found(user_id))?;

        info!(%user_id, "user profile updated");
        Ok(user.profile)
    }

    /// Replaces the user's password after checking the current one.
    pub async fn change_password(
        &self,
        user_id: UserId,
        params: ChangePasswordParams,
    ) -> AppResult<()> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Self::user_not_found(user_id))?;

        if !self
            .password_hasher
            .verify_password(&params.password, &user.password_hash)?
        {
            return Err(AppError::Validation(INCORRECT_CURRENT_PASSWORD.to_owned()));
        }
        if params.new_password != params.confirm_new_password {
            return Err(AppError::Validation(NEW_PASSWORDS_DIFFER.to_owned()));
        }
        validate_password(&params.new_password)?;

        let password_hash = self.password_hasher.hash_password(&params.new_password)?;
        if !self
            .user_repository
            .update_password_hash(user_id, &password_hash)
            .await?
        {
            return Err(Self::user_not_found(user_id));
        }

        info!(%user_id, "password changed");
        Ok(())
    }

    /// Revokes a raw bearer token.
    pub async fn logout(&self, raw_token: &str) -> AppResult<()> {
        let token_hash = token_crypto::hash_token(raw_token);
        if !self
            .token_repository
            .revoke_token(&token_hash, Utc::now())
            .await?
        {
            return Err(AppError::Unauthorized(INVALID_TOKEN.to_owned()));
        }

        Ok(())
    }

    fn user_not_found(user_id: UserId) -> AppError {
        AppError::NotFound(format!("user '{user_id}' does not exist"))
    }
}
