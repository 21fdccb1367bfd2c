use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use taskhub_core::Scope;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a user record.
    UserId
);
uuid_identifier!(
    /// Unique identifier for an organization.
    OrganizationId
);
uuid_identifier!(
    /// Unique identifier for a team.
    TeamId
);
uuid_identifier!(
    /// Unique identifier for a scoped role.
    RoleId
);
uuid_identifier!(
    /// Unique identifier for a persisted catalog permission.
    PermissionId
);

impl From<OrganizationId> for Scope {
    fn from(value: OrganizationId) -> Self {
        Scope::organization(value.as_uuid())
    }
}

impl From<TeamId> for Scope {
    fn from(value: TeamId) -> Self {
        Scope::team(value.as_uuid())
    }
}

#[cfg(test)]
mod tests {
    use taskhub_core::{Scope, ScopeKind};

    use super::{OrganizationId, TeamId, UserId};

    #[test]
    fn identifiers_format_as_uuid() {
        assert_eq!(UserId::new().to_string().len(), 36);
    }

    #[test]
    fn directory_ids_convert_into_scopes() {
        let organization_id = OrganizationId::new();
        let team_id = TeamId::new();

        let organization_scope = Scope::from(organization_id);
        let team_scope = Scope::from(team_id);

        assert_eq!(organization_scope.kind(), ScopeKind::Organization);
        assert_eq!(organization_scope.id(), organization_id.as_uuid());
        assert_eq!(team_scope.kind(), ScopeKind::Team);
    }
}
