use axum::Json;
use taskhub_domain::list_all_permission_definitions;

use crate::dto::PermissionResponse;

pub async fn list_permissions_handler() -> Json<Vec<PermissionResponse>> {
    Json(
        list_all_permission_definitions()
            .into_iter()
            .map(PermissionResponse::from)
            .collect(),
    )
}
