use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, patch, post, put};
use taskhub_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

use cors::build_cors_layer;

pub fn build_router(app_state: AppState, allowed_origin: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/api/v1/auth/logout", post(handlers::auth::logout_handler))
        .route("/api/v1/auth/me", get(handlers::auth::me_handler))
        .route("/api/v1/users/me", put(handlers::users::update_me_handler))
        .route(
            "/api/v1/users/me/password",
            patch(handlers::users::change_password_handler),
        )
        .route(
            "/api/v1/users/{user_id}/profile",
            get(handlers::users::user_profile_handler),
        )
        .route(
            "/api/v1/permissions",
            get(handlers::permissions::list_permissions_handler),
        )
        .route(
            "/api/v1/organizations",
            get(handlers::organizations::list_organizations_handler)
                .post(handlers::organizations::create_organization_handler),
        )
        .route(
            "/api/v1/organizations/{organization_id}",
            get(handlers::organizations::get_organization_handler)
                .put(handlers::organizations::update_organization_handler)
                .delete(handlers::organizations::delete_organization_handler),
        )
        .route(
            "/api/v1/organizations/{organization_id}/roles",
            get(handlers::organizations::list_organization_roles_handler),
        )
        .route(
            "/api/v1/organizations/{organization_id}/members",
            get(handlers::members::list_organization_members_handler)
                .post(handlers::members::add_organization_members_handler),
        )
        .route(
            "/api/v1/organizations/{organization_id}/members/{user_id}",
            delete(handlers::members::remove_organization_member_handler),
        )
        .route(
            "/api/v1/organizations/{organization_id}/members/{user_id}/role",
            put(handlers::members::update_organization_member_role_handler),
        )
        .route(
            "/api/v1/organizations/{organization_id}/teams",
            get(handlers::teams::list_teams_handler).post(handlers::teams::create_team_handler),
        )
        .route(
            "/api/v1/organizations/{organization_id}/teams/{team_id}",
            get(handlers::teams::get_team_handler)
                .put(handlers::teams::update_team_handler)
                .delete(handlers::teams::delete_team_handler),
        )
        .route(
            "/api/v1/organizations/{organization_id}/teams/{team_id}/members",
            get(handlers::members::list_team_members_handler)
                .post(handlers::members::add_team_members_handler),
        )
        .route(
            "/api/v1/organizations/{organization_id}/teams/{team_id}/members/{user_id}",
            delete(handlers::members::remove_team_member_handler),
        )
        .route(
            "/api/v1/organizations/{organization_id}/teams/{team_id}/members/{user_id}/role",
            put(handlers::members::update_team_member_role_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/v1/auth/register",
            post(handlers::auth::register_handler),
        )
        .route("/api/v1/auth/token", post(handlers::auth::token_handler));

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(allowed_origin)?)
        .with_state(app_state))
}
