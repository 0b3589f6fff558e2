//! Password reset tokens and the forgot/reset flows.
//!
//! Raw tokens are 32 random bytes, sent once by email and stored only as a
//! SHA-256 hash. Tokens are single-use and time-limited.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{EmailAddress, PASSWORD_RESET_TEMPLATE, UserId, validate_password};

use crate::{EmailService, EmailTemplateRepository, PasswordHasher, UserRepository};

mod request;
mod reset;
mod token_crypto;


/// Reset requests accepted per email address per hour.
pub const PASSWORD_RESET_REQUESTS_PER_HOUR: i64 = 3;

/// Reset token record as persisted in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetTokenRecord {
    /// Token identifier.
    pub id: uuid::Uuid,
    /// Owner of the token.
    pub user_id: UserId,
    /// Email address the token was sent to.
    pub email: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Repository port for reset token persistence.
#[async_trait]
pub trait PasswordResetTokenRepository: Send + Sync {
    /// Stores a new token hash.
    async fn create_token(
        &self,
        user_id: UserId,
        email: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<uuid::Uuid>;

    /// Marks an unused, unexpired token as used and returns it.
    ///
    /// Marking and lookup happen in one statement so a token can only be
    /// consumed once under concurrent requests.
    async fn consume_valid_token(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<PasswordResetTokenRecord>>;

    /// Invalidates all unused tokens for a user.
    async fn invalidate_tokens_for_user(&self, user_id: UserId) -> AppResult<()>;

    /// Counts tokens issued to an email since `since`.
    async fn count_recent_tokens(&self, email: &str, since: DateTime<Utc>) -> AppResult<i64>;
}

/// Application service for forgot/reset password flows.
#[derive(Clone)]
pub struct PasswordResetService {
    token_repository: Arc<dyn PasswordResetTokenRepository>,
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    email_service: Arc<dyn EmailService>,
    template_repository: Arc<dyn EmailTemplateRepository>,
    frontend_url: String,
    token_ttl: Duration,
}

impl PasswordResetService {
    /// Creates a new password reset service.
    #[must_use]
    pub fn new(
        token_repository: Arc<dyn PasswordResetTokenRepository>,
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        email_service: Arc<dyn EmailService>,
        template_repository: Arc<dyn EmailTemplateRepository>,
        frontend_url: String,
    ) -> Self {
        Self {
            token_repository,
            user_repository,
            password_hasher,
            email_service,
            template_repository,
            frontend_url: frontend_url.trim_end_matches('/').to_owned(),
            token_ttl: Duration::hours(1),
        }
    }

    /// Overrides the token lifetime.
    #[must_use]
    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }
}
