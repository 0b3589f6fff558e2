use std::sync::Arc;

use rolegate_application::{
    AccessTokenService, AuditRepository, AuthorizationRepository, EmailTemplateRepository,
    PasswordHasher, PasswordResetTokenRepository, SecurityAdminRepository, UserRepository,
};
use rolegate_core::AppError;
use rolegate_infrastructure::{
    Argon2PasswordHasher, JwtAccessTokenService, JwtSettings, PostgresAuditRepository,
    PostgresAuthorizationRepository, PostgresEmailTemplateRepository,
    PostgresPasswordResetTokenRepository, PostgresSecurityAdminRepository, PostgresUserRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;

pub(super) struct RepositorySet {
    pub(super) user_repository: Arc<dyn UserRepository>,
    pub(super) authorization_repository: Arc<dyn AuthorizationRepository>,
    pub(super) security_admin_repository: Arc<dyn SecurityAdminRepository>,
    pub(super) audit_repository: Arc<dyn AuditRepository>,
    pub(super) password_reset_token_repository: Arc<dyn PasswordResetTokenRepository>,
    pub(super) email_template_repository: Arc<dyn EmailTemplateRepository>,
    pub(super) password_hasher: Arc<dyn PasswordHasher>,
    pub(super) access_token_service: Arc<dyn AccessTokenService>,
}

pub(super) fn build_repository_set(
    pool: &PgPool,
    config: &ApiConfig,
) -> Result<RepositorySet, AppError> {
    let access_token_service = JwtAccessTokenService::new(JwtSettings {
        secret: config.jwt_secret.clone(),
        issuer: config.jwt_issuer.clone(),
        ttl: config.jwt_ttl,
    })?;

    Ok(RepositorySet {
        user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
        authorization_repository: Arc::new(PostgresAuthorizationRepository::new(pool.clone())),
        security_admin_repository: Arc::new(PostgresSecurityAdminRepository::new(pool.clone())),
        audit_repository: Arc::new(PostgresAuditRepository::new(pool.clone())),
        password_reset_token_repository: Arc::new(PostgresPasswordResetTokenRepository::new(
            pool.clone(),
        )),
        email_template_repository: Arc::new(PostgresEmailTemplateRepository::new(pool.clone())),
        password_hasher: Arc::new(Argon2PasswordHasher::new()),
        access_token_service: Arc::new(access_token_service),
    })
}
