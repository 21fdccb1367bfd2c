//! User accounts and the validation rules applied at registration.

use serde::{Deserialize, Serialize};
use taskhub_core::{AppError, AppResult};

use crate::UserId;

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let parts: Vec<&str> = trimmed.splitn(2, '@').collect();
        if parts.len() != 2 {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        let local = parts[0];
        let domain = parts[1];

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Username length bounds, in characters.
pub const USERNAME_LENGTH: std::ops::RangeInclusive<usize> = 5..=64;

/// First and last name length bounds, in characters after trimming.
pub const PERSON_NAME_LENGTH: std::ops::RangeInclusive<usize> = 2..=128;

/// Minimum password length (NIST SP800-63B, single factor).
pub const PASSWORD_MIN_LENGTH: usize = 10;

/// Maximum password length to allow passphrases.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validated login name.
///
/// Letters, digits, `.`, `_` and `-` only; stored as given so that display
/// matches registration, compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        let length = trimmed.chars().count();

        if !USERNAME_LENGTH.contains(&length) {
            return Err(AppError::Validation(format!(
                "username must be between {} and {} characters",
                USERNAME_LENGTH.start(),
                USERNAME_LENGTH.end()
            )));
        }

        if !trimmed
            .chars()
            .all(|character| character.is_alphanumeric() || matches!(character, '.' | '_' | '-'))
        {
            return Err(AppError::Validation(
                "username may only contain letters, digits, '.', '_' and '-'".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the validated username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Trims and validates a first or last name.
pub fn validate_person_name(label: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if !PERSON_NAME_LENGTH.contains(&trimmed.chars().count()) {
        return Err(AppError::Validation(format!(
            "{label} must be between {} and {} characters",
            PERSON_NAME_LENGTH.start(),
            PERSON_NAME_LENGTH.end()
        )));
    }

    Ok(trimmed.to_owned())
}

/// Validates a plaintext password against OWASP and NIST rules.
///
/// - Min length is 10 characters.
/// - Max length is 128 characters (protects against Argon2id DoS).
/// - Rejects common breached passwords from an embedded list.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    if is_common_password(password) {
        return Err(AppError::Validation(
            "this password is too common and has appeared in data breaches".to_owned(),
        ));
    }

    Ok(())
}

/// Checks whether a password appears in the embedded common passwords list.
fn is_common_password(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.iter().any(|entry| *entry == lowered)
}

/// Top breached passwords.
static COMMON_PASSWORDS: &[&str] = &[
    "password",
    "123456",
    "12345678",
    "1234567890",
    "qwerty",
    "abc123",
    "monkey",
    "master",
    "dragon",
    "111111",
    "baseball",
    "iloveyou",
    "trustno1",
    "sunshine",
    "princess",
    "football",
    "shadow",
    "superman",
    "qwerty123",
    "michael",
    "password1",
    "password123",
    "welcome",
    "login",
    "admin",
    "letmein",
    "starwars",
    "solo",
    "passw0rd",
    "121212",
    "flower",
    "hottie",
    "loveme",
    "access",
    "hello",
    "charlie",
    "donald",
    "qwertyuiop",
    "whatever",
    "654321",
    "7777777",
    "123123",
    "jordan",
    "hunter",
    "pepper",
    "buster",
    "joshua",
    "freedom",
    "1234567",
    "12345",
];

/// Public view of a user account, safe to return from any layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Canonical email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl UserProfile {
    /// Returns `"first last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
