//! Process-local store implementing every storage port.
//!
//! Used by the API when no database is configured and by router tests.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use taskhub_application::UserRecord;
use taskhub_core::{PageRequest, Scope};
use taskhub_domain::{
    Membership, Organization, OrganizationId, PermissionId, PermissionRecord, Role, RoleId, Team,
    TeamId, UserId,
};
use tokio::sync::RwLock;

mod access;
mod directory;
mod users;

/// In-memory implementation of the access-control, directory, user and token ports.
///
/// All maps live behind one lock so cascading deletes stay consistent.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    state: RwLock<InMemoryState>,
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default)]
struct InMemoryState {
    permissions: HashMap<PermissionId, PermissionRecord>,
    roles: HashMap<RoleId, Role>,
    role_permissions: HashSet<(RoleId, PermissionId)>,
    memberships: HashMap<(UserId, Scope), StoredMembership>,
    next_sequence: u64,
    organizations: HashMap<OrganizationId, Organization>,
    teams: HashMap<TeamId, Team>,
    users: HashMap<UserId, UserRecord>,
    tokens: HashMap<String, StoredToken>,
}

#[derive(Debug, Clone)]
struct StoredMembership {
    sequence: u64,
    membership: Membership,
}

#[derive(Debug, Clone)]
struct StoredToken {
    user_id: UserId,
    expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl StoredToken {
    fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

impl InMemoryState {
    fn purge_scopes(&mut self, scopes: &[Scope]) {
        let removed_roles: HashSet<RoleId> = self
            .roles
            .values()
            .filter(|role| scopes.contains(&role.scope))
            .map(|role| role.id)
            .collect();

        self.roles.retain(|role_id, _| !removed_roles.contains(role_id));
        self.role_permissions
            .retain(|(role_id, _)| !removed_roles.contains(role_id));
        self.memberships.retain(|(_, scope), stored| {
            !scopes.contains(scope) && !removed_roles.contains(&stored.membership.role_id)
        });
    }
}

fn page_slice<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);

    items.iter().skip(offset).take(limit).cloned().collect()
}
