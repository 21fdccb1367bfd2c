//! Organizations and teams: the scopes that roles and memberships attach to.

use chrono::{DateTime, Utc};
use serde::Serialize;
use taskhub_core::{AppError, AppResult, Scope};

use crate::{OrganizationId, TeamId, UserId};

/// Organization name length bounds, in characters after trimming.
pub const ORGANIZATION_NAME_LENGTH: std::ops::RangeInclusive<usize> = 5..=32;

/// Team name length bounds, in characters after trimming.
pub const TEAM_NAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=64;

/// Maximum description length for organizations and teams.
pub const DESCRIPTION_MAX_LENGTH: usize = 1024;

/// Persisted organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
    /// Storage identifier.
    pub id: OrganizationId,
    /// Globally unique display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// User who created the organization.
    pub owner_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Returns the membership scope of this organization.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.id.into()
    }
}

/// Persisted team nested in one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    /// Storage identifier.
    pub id: TeamId,
    /// Name, unique within the organization.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// User who created the team.
    pub owner_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Returns the membership scope of this team.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.id.into()
    }
}

/// Validated name and description used to create or update an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationDraft {
    name: String,
    description: Option<String>,
}

impl OrganizationDraft {
    /// Trims and validates organization input.
    pub fn new(name: impl Into<String>, description: Option<String>) -> AppResult<Self> {
        Ok(Self {
            name: validate_name("organization", name.into(), ORGANIZATION_NAME_LENGTH)?,
            description: normalize_description(description)?,
        })
    }

    /// Returns the trimmed name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the trimmed description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Validated name and description used to create or update a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDraft {
    name: String,
    description: Option<String>,
}

impl TeamDraft {
    /// Trims and validates team input.
    pub fn new(name: impl Into<String>, description: Option<String>) -> AppResult<Self> {
        Ok(Self {
            name: validate_name("team", name.into(), TEAM_NAME_LENGTH)?,
            description: normalize_description(description)?,
        })
    }

    /// Returns the trimmed name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the trimmed description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

fn validate_name(
    label: &str,
    value: String,
    bounds: std::ops::RangeInclusive<usize>,
) -> AppResult<String> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();
    if !bounds.contains(&length) {
        return Err(AppError::Validation(format!(
            "{label} name must be between {} and {} characters",
            bounds.start(),
            bounds.end()
        )));
    }

    Ok(trimmed.to_owned())
}

// Blank descriptions are stored as absent.
fn normalize_description(value: Option<String>) -> AppResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.chars().count() > DESCRIPTION_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "description must not exceed {DESCRIPTION_MAX_LENGTH} characters"
        )));
    }

    Ok(Some(trimmed.to_owned()))
}
