use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppError;

/// Kind of boundary a role or membership applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// Organization-wide scope.
    Organization,
    /// Team scope nested inside one organization.
    Team,
}

impl ScopeKind {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Team => "team",
        }
    }
}

impl Display for ScopeKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ScopeKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "organization" => Ok(Self::Organization),
            "team" => Ok(Self::Team),
            _ => Err(AppError::Validation(format!(
                "unknown scope kind '{value}'"
            ))),
        }
    }
}

/// One concrete organization or team that roles and memberships attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    kind: ScopeKind,
    id: Uuid,
}

impl Scope {
    /// Creates a scope from its kind and identifier.
    #[must_use]
    pub fn new(kind: ScopeKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    /// Creates an organization scope.
    #[must_use]
    pub fn organization(id: Uuid) -> Self {
        Self::new(ScopeKind::Organization, id)
    }

    /// Creates a team scope.
    #[must_use]
    pub fn team(id: Uuid) -> Self {
        Self::new(ScopeKind::Team, id)
    }

    /// Returns the scope kind.
    #[must_use]
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Returns the organization or team identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Display for Scope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} '{}'", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use uuid::Uuid;

    use super::{Scope, ScopeKind};

    #[test]
    fn scope_kind_parses_storage_values() {
        assert_eq!(
            ScopeKind::from_str("organization").ok(),
            Some(ScopeKind::Organization)
        );
        assert_eq!(ScopeKind::from_str("team").ok(), Some(ScopeKind::Team));
        assert!(ScopeKind::from_str("project").is_err());
    }

    #[test]
    fn scopes_with_same_id_but_different_kind_differ() {
        let id = Uuid::new_v4();
        assert_ne!(Scope::organization(id), Scope::team(id));
        assert_eq!(Scope::team(id).to_string(), format!("team '{id}'"));
    }
}
