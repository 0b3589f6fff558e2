//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod console_email_service;
mod jwt_access_token_service;
mod postgres_audit_repository;
mod postgres_authorization_repository;
mod postgres_email_template_repository;
mod postgres_password_reset_token_repository;
mod postgres_security_admin_repository;
mod postgres_user_repository;
mod smtp_email_service;

#[cfg(test)]
mod test_database;

use sqlx::migrate::Migrator;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use console_email_service::ConsoleEmailService;
pub use jwt_access_token_service::{JwtAccessTokenService, JwtSettings, MIN_SECRET_LENGTH};
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_email_template_repository::PostgresEmailTemplateRepository;
pub use postgres_password_reset_token_repository::PostgresPasswordResetTokenRepository;
pub use postgres_security_admin_repository::PostgresSecurityAdminRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use smtp_email_service::{SmtpEmailConfig, SmtpEmailService};

/// Schema migrations embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Maps a unique-constraint violation to `Conflict` and anything else to `Internal`.
pub(crate) fn conflict_or_internal(
    error: sqlx::Error,
    operation: &str,
    conflict_message: impl FnOnce() -> String,
) -> rolegate_core::AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return rolegate_core::AppError::Conflict(conflict_message());
    }

    rolegate_core::AppError::Internal(format!("failed to {operation}: {error}"))
}
