use super::*;

/// One requested addition in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMemberEntry {
    /// Username or user id string.
    pub identifier: String,
    /// Role name inside the target scope; the batch default when absent.
    pub role_name: Option<String>,
}

/// Per-entry result of a batch addition.
#[derive(Debug)]
pub enum MemberOutcome {
    /// The member was added.
    Added {
        /// Identifier from the request entry.
        identifier: String,
        /// Stored membership.
        member: MemberResponse,
    },
    /// The entry failed; earlier and later entries are unaffected.
    Failed {
        /// Identifier from the request entry.
        identifier: String,
        /// Failure for this entry.
        error: AppError,
    },
}

impl MemberOutcome {
    /// Returns the identifier of the originating entry.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Added { identifier, .. } | Self::Failed { identifier, .. } => identifier,
        }
    }

    /// Returns whether the entry was added.
    #[must_use]
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }
}

impl MembershipService {
    /// Adds several members, one outcome per entry in input order.
    ///
    /// Entries are applied independently: a failing entry neither stops the
    /// batch nor rolls back entries already added. Entries without a role
    /// name receive `default_role_name`.
    pub async fn add_members_batch(
        &self,
        actor: UserId,
        scope: Scope,
        entries: Vec<AddMemberEntry>,
        default_role_name: &str,
    ) -> Vec<MemberOutcome> {
        let mut outcomes = Vec::with_capacity(entries.len());

        for entry in entries {
            let role_name = entry.role_name.as_deref().unwrap_or(default_role_name);
            let outcome = match self
                .add_member(actor, scope, &entry.identifier, role_name)
                .await
            {
                Ok(member) => MemberOutcome::Added {
                    identifier: entry.identifier,
                    member,
                },
                Err(error) => MemberOutcome::Failed {
                    identifier: entry.identifier,
                    error,
                },
            };
            outcomes.push(outcome);
        }

        let added = outcomes.iter().filter(|outcome| outcome.is_added()).count();
        info!(%scope, added, failed = outcomes.len() - added, "member batch processed");

        outcomes
    }
}
