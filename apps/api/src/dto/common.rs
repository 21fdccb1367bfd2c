use serde::{Deserialize, Serialize};
use taskhub_core::{AppError, PageRequest};
use taskhub_domain::PermissionDefinition;

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `?page=&size=` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl TryFrom<PageQuery> for PageRequest {
    type Error = AppError;

    fn try_from(query: PageQuery) -> Result<Self, Self::Error> {
        let defaults = PageRequest::default();
        PageRequest::new(
            query.page.unwrap_or(defaults.page()),
            query.size.unwrap_or(defaults.size()),
        )
    }
}

/// API representation of a catalog permission.
#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub name: &'static str,
    pub description: &'static str,
    pub group: &'static str,
}

impl From<PermissionDefinition> for PermissionResponse {
    fn from(value: PermissionDefinition) -> Self {
        Self {
            name: value.name,
            description: value.description,
            group: value.group.as_str(),
        }
    }
}
