use async_trait::async_trait;
use chrono::{DateTime, Utc};
use taskhub_core::AppResult;
use taskhub_domain::{EmailAddress, UserId, UserProfile, Username};

/// User record returned by repository queries.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Public profile.
    pub profile: UserProfile,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Inactive users cannot log in or authenticate.
    pub is_active: bool,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Validated input for user creation.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name.
    pub username: Username,
    /// Unique email address.
    pub email: EmailAddress,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Argon2id password hash.
    pub password_hash: String,
}

/// Validated profile changes. Absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New unique email address.
    pub email: Option<EmailAddress>,
    /// New active flag. Deactivated users can no longer log in.
    pub is_active: Option<bool>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Creates a user. Duplicate username or email fails with `AppError::Conflict`.
    async fn create(&self, user: NewUser) -> AppResult<UserRecord>;

    /// Stores the time of a successful login.
    async fn record_login(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<()>;

    /// Applies profile changes and returns the updated user, or `None` when the
    /// user does not exist. An email taken by another user fails with
    /// `AppError::Conflict`.
    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> AppResult<Option<UserRecord>>;

    /// Replaces the stored password hash. Returns whether the user exists.
    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> AppResult<bool>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Repository port for issued bearer tokens. Only SHA-256 digests are stored.
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    /// Stores a token digest for a user.
    async fn store_token(
        &self,
        token_hash: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Returns the owner of an unrevoked token that has not expired at `now`.
    async fn find_active_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserId>>;

    /// Revokes a token. Returns whether an active token was revoked.
    async fn revoke_token(&self, token_hash: &str, at: DateTime<Utc>) -> AppResult<bool>;
}
