use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use rolegate_core::AppError;
use rolegate_domain::AccessRequirement;
use tower_http::trace::TraceLayer;

use crate::api_config::ApiConfig;
use crate::handlers;
use crate::middleware::{require_access, require_auth};
use crate::state::AppState;

mod cors;

pub fn build_router(app_state: AppState, config: &ApiConfig) -> Result<Router, AppError> {
    let admin_requirement = AccessRequirement::any_role(config.admin_roles.iter().cloned());

    let admin_routes = Router::new()
        .route(
            "/api/admin/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route(
            "/api/admin/users/{user_id}",
            get(handlers::users::get_user_handler)
                .put(handlers::users::update_user_handler)
                .delete(handlers::users::delete_user_handler),
        )
        .route(
            "/api/admin/users/{user_id}/roles",
            get(handlers::users::list_user_roles_handler)
                .post(handlers::users::grant_user_role_handler),
        )
        .route(
            "/api/admin/users/{user_id}/roles/{role_id}",
            delete(handlers::users::revoke_user_role_handler),
        )
        .route(
            "/api/admin/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/api/admin/roles/{role_id}",
            get(handlers::roles::get_role_handler)
                .put(handlers::roles::update_role_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/admin/roles/{role_id}/permissions",
            put(handlers::roles::set_role_permissions_handler),
        )
        .route(
            "/api/admin/roles/{role_id}/permissions/{permission_id}",
            post(handlers::roles::attach_role_permission_handler)
                .delete(handlers::roles::detach_role_permission_handler),
        )
        .route(
            "/api/admin/permissions",
            get(handlers::permissions::list_permissions_handler)
                .post(handlers::permissions::create_permission_handler),
        )
        .route(
            "/api/admin/permissions/{permission_id}",
            get(handlers::permissions::get_permission_handler)
                .put(handlers::permissions::update_permission_handler)
                .delete(handlers::permissions::delete_permission_handler),
        )
        .route(
            "/api/admin/email-templates",
            get(handlers::email_templates::list_email_templates_handler)
                .post(handlers::email_templates::create_email_template_handler),
        )
        .route(
            "/api/admin/email-templates/{template_id}",
            get(handlers::email_templates::get_email_template_handler)
                .put(handlers::email_templates::update_email_template_handler)
                .delete(handlers::email_templates::delete_email_template_handler),
        )
        .route(
            "/api/admin/audit-log",
            get(handlers::audit::list_audit_log_handler),
        )
        .route_layer(from_fn_with_state(admin_requirement, require_access));

    let protected_routes = Router::new()
        .route(
            "/api/profile",
            get(handlers::profile::profile_handler).put(handlers::profile::update_profile_handler),
        )
        .route(
            "/api/profile/password",
            put(handlers::profile::change_password_handler),
        )
        .merge(admin_routes)
        .route_layer(from_fn_with_state(
            app_state.authentication_service.clone(),
            require_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/api/auth/register", post(handlers::auth::register_handler))
        .route("/api/auth/login", post(handlers::auth::login_handler))
        .route(
            "/api/auth/forgot-password",
            post(handlers::auth::forgot_password_handler),
        )
        .route(
            "/api/auth/reset-password",
            post(handlers::auth::reset_password_handler),
        );

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(&config.frontend_url)?)
        .with_state(app_state))
}
