use rolegate_application::{
    AuditLogService, AuthenticationService, AuthorizationService, EmailTemplateService,
    PasswordResetService, SecurityAdminService, UserService,
};
use rolegate_core::AppError;
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

use super::email::build_email_service;

mod repositories;

pub fn build_app_state(config: &ApiConfig, pool: PgPool) -> Result<AppState, AppError> {
    let repositories = repositories::build_repository_set(&pool, config)?;
    let authorization_service =
        AuthorizationService::new(repositories.authorization_repository.clone());

    Ok(AppState {
        user_service: UserService::new(
            repositories.user_repository.clone(),
            repositories.password_hasher.clone(),
            repositories.security_admin_repository.clone(),
            repositories.audit_repository.clone(),
        )
        .with_default_role(config.default_user_role.clone()),
        authentication_service: AuthenticationService::new(
            repositories.access_token_service,
            repositories.user_repository.clone(),
            authorization_service,
        ),
        security_admin_service: SecurityAdminService::new(
            repositories.security_admin_repository,
            repositories.user_repository.clone(),
            repositories.audit_repository.clone(),
        ),
        password_reset_service: PasswordResetService::new(
            repositories.password_reset_token_repository,
            repositories.user_repository,
            repositories.password_hasher,
            build_email_service(config),
            repositories.email_template_repository.clone(),
            config.frontend_url.clone(),
        )
        .with_token_ttl(config.password_reset_ttl),
        email_template_service: EmailTemplateService::new(
            repositories.email_template_repository,
            repositories.audit_repository.clone(),
        ),
        audit_log_service: AuditLogService::new(repositories.audit_repository),
    })
}
