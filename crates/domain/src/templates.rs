//! Default role templates materialized into every new organization and team.

use std::collections::{BTreeSet, HashSet};

use taskhub_core::{AppError, AppResult, ScopeKind};

use crate::Permission;

/// Template key that receives the full permission set of its scope.
pub const OWNER_TEMPLATE_KEY: &str = "owner";

/// Template key assigned to added members that name no role.
pub const DEFAULT_MEMBER_TEMPLATE_KEY: &str = "viewer";

/// Predefined role that bootstrap turns into a real role row per scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTemplate {
    key: String,
    name: String,
    description: String,
    permission_names: BTreeSet<String>,
}

impl RoleTemplate {
    /// Creates a template from its key, stored role name and permission names.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        permission_names: impl IntoIterator<Item = impl Into<String>>,
    ) -> AppResult<Self> {
        let key = key.into();
        let name = name.into();
        if key.trim().is_empty() || name.trim().is_empty() {
            return Err(AppError::Validation(
                "role template key and name must not be empty".to_owned(),
            ));
        }

        let permission_names: BTreeSet<String> =
            permission_names.into_iter().map(Into::into).collect();
        if permission_names
            .iter()
            .any(|permission| permission.trim().is_empty())
        {
            return Err(AppError::Validation(format!(
                "role template '{key}' references an empty permission name"
            )));
        }

        Ok(Self {
            key,
            name,
            description: description.into(),
            permission_names,
        })
    }

    /// Returns the registry key, e.g. `owner` or `team_lead`.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the role name stored for this template, e.g. `Owner`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the template description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the permission names granted by this template.
    #[must_use]
    pub fn permission_names(&self) -> &BTreeSet<String> {
        &self.permission_names
    }

    fn from_definition(definition: &TemplateDefinition) -> Self {
        Self {
            key: definition.key.to_owned(),
            name: definition.name.to_owned(),
            description: definition.description.to_owned(),
            permission_names: definition
                .permissions
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScopeTemplates {
    owner: RoleTemplate,
    others: Vec<RoleTemplate>,
}

impl ScopeTemplates {
    fn validated(kind: ScopeKind, templates: Vec<RoleTemplate>) -> AppResult<Self> {
        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        for template in &templates {
            if !keys.insert(template.key.clone()) {
                return Err(AppError::Validation(format!(
                    "duplicate {kind} role template key '{}'",
                    template.key
                )));
            }
            if !names.insert(template.name.clone()) {
                return Err(AppError::Validation(format!(
                    "duplicate {kind} role template name '{}'",
                    template.name
                )));
            }
        }

        let (owners, others): (Vec<RoleTemplate>, Vec<RoleTemplate>) = templates
            .into_iter()
            .partition(|template| template.key == OWNER_TEMPLATE_KEY);
        let Some(owner) = owners.into_iter().next() else {
            return Err(AppError::Validation(format!(
                "{kind} role templates must define an '{OWNER_TEMPLATE_KEY}' template"
            )));
        };

        if let Some(template) = others
            .iter()
            .find(|template| !template.permission_names.is_subset(&owner.permission_names))
        {
            return Err(AppError::Validation(format!(
                "{kind} template '{}' grants permissions the owner template lacks",
                template.key
            )));
        }

        Ok(Self { owner, others })
    }

    fn iter(&self) -> impl Iterator<Item = &RoleTemplate> {
        std::iter::once(&self.owner).chain(self.others.iter())
    }
}

/// Read-only registry of organization and team role templates.
///
/// Built once at startup and shared by reference; the same registry drives
/// role bootstrap and the owner membership assigned to creators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTemplateRegistry {
    organization: ScopeTemplates,
    team: ScopeTemplates,
}

impl RoleTemplateRegistry {
    /// Creates a registry, validating keys, names and the owner superset rule.
    pub fn new(organization: Vec<RoleTemplate>, team: Vec<RoleTemplate>) -> AppResult<Self> {
        Ok(Self {
            organization: ScopeTemplates::validated(ScopeKind::Organization, organization)?,
            team: ScopeTemplates::validated(ScopeKind::Team, team)?,
        })
    }

    /// Builds the built-in templates through the same validation as [`Self::new`].
    pub fn standard() -> AppResult<Self> {
        Self::new(
            ORGANIZATION_TEMPLATE_DEFINITIONS
                .iter()
                .map(RoleTemplate::from_definition)
                .collect(),
            TEAM_TEMPLATE_DEFINITIONS
                .iter()
                .map(RoleTemplate::from_definition)
                .collect(),
        )
    }

    /// Returns the templates of one scope kind, owner first.
    pub fn templates(&self, kind: ScopeKind) -> impl Iterator<Item = &RoleTemplate> {
        self.scope(kind).iter()
    }

    /// Returns the organization templates, owner first.
    pub fn organization_templates(&self) -> impl Iterator<Item = &RoleTemplate> {
        self.organization.iter()
    }

    /// Returns the team templates, owner first.
    pub fn team_templates(&self) -> impl Iterator<Item = &RoleTemplate> {
        self.team.iter()
    }

    /// Returns the owner template of one scope kind.
    #[must_use]
    pub fn owner(&self, kind: ScopeKind) -> &RoleTemplate {
        &self.scope(kind).owner
    }

    /// Finds a template by registry key.
    #[must_use]
    pub fn find(&self, kind: ScopeKind, key: &str) -> Option<&RoleTemplate> {
        self.templates(kind).find(|template| template.key == key)
    }

    fn scope(&self, kind: ScopeKind) -> &ScopeTemplates {
        match kind {
            ScopeKind::Organization => &self.organization,
            ScopeKind::Team => &self.team,
        }
    }
}

struct TemplateDefinition {
    key: &'static str,
    name: &'static str,
    description: &'static str,
    permissions: &'static [Permission],
}

const MEMBER_TASK_PERMISSIONS: [Permission; 7] = [
    Permission::TaskCreate,
    Permission::TaskRead,
    Permission::TaskUpdate,
    Permission::TaskAssignUser,
    Permission::TaskChangeStatus,
    Permission::TaskComment,
    Permission::TaskManageAttachments,
];

const ORGANIZATION_TEMPLATE_DEFINITIONS: [TemplateDefinition; 5] = [
    TemplateDefinition {
        key: OWNER_TEMPLATE_KEY,
        name: "Owner",
        description: "The creator of the organization. Holds every permission.",
        permissions: Permission::all(),
    },
    TemplateDefinition {
        key: "admin",
        name: "Administrator",
        description: "Manages the organization's workspace, members and teams. \
                      Cannot delete the organization or manage billing.",
        permissions: &[
            Permission::OrganizationReadDetails,
            Permission::OrganizationUpdateSettings,
            Permission::OrganizationManageMembers,
            Permission::OrganizationManageRoles,
            Permission::OrganizationCreateCustomRoles,
            Permission::OrganizationManageCustomRoles,
            Permission::OrganizationViewAuditLog,
            Permission::TeamCreate,
            Permission::TeamRead,
            Permission::TeamUpdate,
            Permission::TeamDelete,
            Permission::TeamManageMembers,
            Permission::ProjectCreate,
            Permission::ProjectRead,
            Permission::ProjectUpdate,
            Permission::ProjectDelete,
            Permission::ProjectManageMembers,
            Permission::ProjectChangeStatus,
            Permission::TaskCreate,
            Permission::TaskRead,
            Permission::TaskUpdate,
            Permission::TaskDelete,
            Permission::TaskAssignUser,
            Permission::TaskChangeStatus,
            Permission::TaskComment,
            Permission::TaskManageAttachments,
            Permission::ReportsView,
            Permission::ReportsExport,
        ],
    },
    TemplateDefinition {
        key: "member",
        name: "Member",
        description: "Default role that collaborates on the projects it belongs to.",
        permissions: &[
            Permission::OrganizationReadDetails,
            Permission::TeamRead,
            Permission::ProjectRead,
            MEMBER_TASK_PERMISSIONS[0],
            MEMBER_TASK_PERMISSIONS[1],
            MEMBER_TASK_PERMISSIONS[2],
            MEMBER_TASK_PERMISSIONS[3],
            MEMBER_TASK_PERMISSIONS[4],
            MEMBER_TASK_PERMISSIONS[5],
            MEMBER_TASK_PERMISSIONS[6],
        ],
    },
    TemplateDefinition {
        key: "team_lead",
        name: "Team Lead",
        description: "Manages a team and its projects.",
        permissions: &[
            Permission::OrganizationReadDetails,
            Permission::TeamRead,
            Permission::TeamUpdate,
            Permission::TeamManageMembers,
            Permission::ProjectCreate,
            Permission::ProjectRead,
            Permission::ProjectUpdate,
            Permission::ProjectManageMembers,
            MEMBER_TASK_PERMISSIONS[0],
            MEMBER_TASK_PERMISSIONS[1],
            MEMBER_TASK_PERMISSIONS[2],
            MEMBER_TASK_PERMISSIONS[3],
            MEMBER_TASK_PERMISSIONS[4],
            MEMBER_TASK_PERMISSIONS[5],
            MEMBER_TASK_PERMISSIONS[6],
        ],
    },
    TemplateDefinition {
        key: DEFAULT_MEMBER_TEMPLATE_KEY,
        name: "Viewer",
        description: "Read-only access for clients and stakeholders.",
        permissions: &[
            Permission::OrganizationReadDetails,
            Permission::TeamRead,
            Permission::ProjectRead,
            Permission::TaskRead,
            Permission::ReportsView,
        ],
    },
];

const TEAM_TEMPLATE_DEFINITIONS: [TemplateDefinition; 4] = [
    TemplateDefinition {
        key: OWNER_TEMPLATE_KEY,
        name: "Team Owner",
        description: "The creator of the team. Holds every team, project and task permission.",
        permissions: &[
            Permission::TeamCreate,
            Permission::TeamRead,
            Permission::TeamUpdate,
            Permission::TeamDelete,
            Permission::TeamManageMembers,
            Permission::ProjectCreate,
            Permission::ProjectRead,
            Permission::ProjectUpdate,
            Permission::ProjectDelete,
            Permission::ProjectManageMembers,
            Permission::ProjectChangeStatus,
            Permission::TaskCreate,
            Permission::TaskRead,
            Permission::TaskUpdate,
            Permission::TaskDelete,
            Permission::TaskAssignUser,
            Permission::TaskChangeStatus,
            Permission::TaskComment,
            Permission::TaskManageAttachments,
        ],
    },
    TemplateDefinition {
        key: "lead",
        name: "Team Lead",
        description: "Manages the team, its members and its projects.",
        permissions: &[
            Permission::TeamRead,
            Permission::TeamUpdate,
            Permission::TeamManageMembers,
            Permission::ProjectCreate,
            Permission::ProjectRead,
            Permission::ProjectUpdate,
            Permission::ProjectManageMembers,
            MEMBER_TASK_PERMISSIONS[0],
            MEMBER_TASK_PERMISSIONS[1],
            MEMBER_TASK_PERMISSIONS[2],
            MEMBER_TASK_PERMISSIONS[3],
            MEMBER_TASK_PERMISSIONS[4],
            MEMBER_TASK_PERMISSIONS[5],
            MEMBER_TASK_PERMISSIONS[6],
        ],
    },
    TemplateDefinition {
        key: "member",
        name: "Team Member",
        description: "Participates in the team's projects and tasks.",
        permissions: &[
            Permission::TeamRead,
            Permission::ProjectRead,
            MEMBER_TASK_PERMISSIONS[0],
            MEMBER_TASK_PERMISSIONS[1],
            MEMBER_TASK_PERMISSIONS[2],
            MEMBER_TASK_PERMISSIONS[3],
            MEMBER_TASK_PERMISSIONS[4],
            MEMBER_TASK_PERMISSIONS[5],
            MEMBER_TASK_PERMISSIONS[6],
        ],
    },
    TemplateDefinition {
        key: DEFAULT_MEMBER_TEMPLATE_KEY,
        name: "Team Viewer",
        description: "Read-only access to the team, its projects and tasks.",
        permissions: &[Permission::TeamRead, Permission::ProjectRead, Permission::TaskRead],
    },
];

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;
    use taskhub_core::ScopeKind;

    use super::{OWNER_TEMPLATE_KEY, RoleTemplate, RoleTemplateRegistry};
    use crate::Permission;

    fn standard_registry() -> RoleTemplateRegistry {
        RoleTemplateRegistry::standard()
            .unwrap_or_else(|error| panic!("standard registry should validate: {error}"))
    }

    fn standard_templates(kind: ScopeKind) -> Vec<RoleTemplate> {
        standard_registry()
            .templates(kind)
            .cloned()
            .collect()
    }

    #[test]
    fn standard_registry_passes_validation() {
        let registry = RoleTemplateRegistry::new(
            standard_templates(ScopeKind::Organization),
            standard_templates(ScopeKind::Team),
        );

        assert_eq!(registry.ok(), Some(standard_registry()));
    }

    #[test]
    fn registry_without_templates_is_rejected() {
        assert!(RoleTemplateRegistry::new(Vec::new(), standard_templates(ScopeKind::Team)).is_err());
        assert!(
            RoleTemplateRegistry::new(standard_templates(ScopeKind::Organization), Vec::new())
                .is_err()
        );
    }

    #[test]
    fn standard_registry_exposes_expected_keys() {
        let registry = standard_registry();
        let organization_keys: Vec<&str> = registry
            .organization_templates()
            .map(RoleTemplate::key)
            .collect();
        let team_keys: Vec<&str> = registry.team_templates().map(RoleTemplate::key).collect();

        assert_eq!(
            organization_keys,
            vec!["owner", "admin", "member", "team_lead", "viewer"]
        );
        assert_eq!(team_keys, vec!["owner", "lead", "member", "viewer"]);
        assert_eq!(registry.owner(ScopeKind::Organization).name(), "Owner");
        assert_eq!(registry.owner(ScopeKind::Team).name(), "Team Owner");
    }

    #[test]
    fn organization_owner_holds_the_whole_catalog() {
        let registry = standard_registry();
        let catalog: BTreeSet<String> = Permission::all()
            .iter()
            .map(|permission| permission.as_str().to_owned())
            .collect();

        assert_eq!(
            registry.owner(ScopeKind::Organization).permission_names(),
            &catalog
        );
    }

    #[test]
    fn viewer_cannot_delete_the_organization() {
        let registry = standard_registry();
        let viewer = registry.find(ScopeKind::Organization, "viewer");

        assert!(viewer.is_some_and(|template| {
            !template
                .permission_names()
                .contains(Permission::OrganizationDelete.as_str())
        }));
    }

    #[test]
    fn administrator_covers_every_template_but_the_owner() {
        let registry = standard_registry();
        let Some(admin) = registry.find(ScopeKind::Organization, "admin") else {
            panic!("administrator template should exist");
        };

        for template in registry.organization_templates() {
            let covered = template.permission_names().is_subset(admin.permission_names());
            assert_eq!(covered, template.key() != OWNER_TEMPLATE_KEY, "{}", template.key());
        }
    }

    #[test]
    fn registry_rejects_templates_exceeding_the_owner() {
        let owner = RoleTemplate::new(OWNER_TEMPLATE_KEY, "Owner", "", ["team:read"]);
        let admin = RoleTemplate::new("admin", "Administrator", "", ["team:read", "team:delete"]);
        let (Ok(owner), Ok(admin)) = (owner, admin) else {
            panic!("templates should be valid on their own");
        };

        let result = RoleTemplateRegistry::new(
            vec![owner, admin],
            standard_templates(ScopeKind::Team),
        );
        assert!(result.is_err());
    }

    #[test]
    fn registry_requires_an_owner_template() {
        let result = RoleTemplateRegistry::new(
            standard_templates(ScopeKind::Organization),
            standard_templates(ScopeKind::Team)
                .into_iter()
                .filter(|template| template.key() != OWNER_TEMPLATE_KEY)
                .collect(),
        );
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn owner_is_a_superset_of_every_template(kind in prop_oneof![
            Just(ScopeKind::Organization),
            Just(ScopeKind::Team),
        ]) {
            let registry = standard_registry();
            let owner = registry.owner(kind).permission_names();

            for template in registry.templates(kind) {
                prop_assert!(template.permission_names().is_subset(owner));
            }
        }

        #[test]
        fn template_permissions_come_from_the_catalog(kind in prop_oneof![
            Just(ScopeKind::Organization),
            Just(ScopeKind::Team),
        ]) {
            let registry = standard_registry();
            for template in registry.templates(kind) {
                for name in template.permission_names() {
                    prop_assert!(name.parse::<Permission>().is_ok());
                }
            }
        }
    }
}
