//! User management ports and application service.
//!
//! Owns the account lifecycle: self-service registration, credential
//! login with lockout, profile and password changes, and administrator
//! account management.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use rolegate_core::{AppError, AppResult, UserIdentity};
use rolegate_domain::{AuditAction, EmailAddress, SystemPermission, UserId, display_name};

use crate::{AuditEvent, AuditRepository, AuthenticatedUser, SecurityAdminRepository};

mod admin;
mod bootstrap;
mod login;
mod password;
mod profile;
mod registration;


/// Consecutive failed logins that lock an account.
pub const MAX_FAILED_LOGINS: i32 = 5;

/// How long a locked account stays locked.
pub const LOCKOUT_MINUTES: i64 = 15;

/// Largest page the user listing returns.
pub const USER_LIST_MAX_LIMIT: usize = 200;

/// User record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Canonical email address.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Inactive accounts cannot log in or use issued tokens.
    pub is_active: bool,
    /// Number of consecutive failed login attempts.
    pub failed_login_count: i32,
    /// Account is locked until this time, if set.
    pub locked_until: Option<DateTime<Utc>>,
    /// Last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Returns the name shown for this user.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name, &self.email)
    }

    /// Returns the identity carried by authenticated requests.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(self.id.to_string(), self.email.clone(), self.display_name())
    }
}

/// Insert payload for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Canonical email address.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the account can log in.
    pub is_active: bool,
}

/// Self-service profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfileUpdate {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Full set of administrator-editable account fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccountUpdate {
    /// Canonical email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the account can log in.
    pub is_active: bool,
    /// Replacement password hash. Setting it also clears the lockout state.
    pub password_hash: Option<String>,
}

/// Offset pagination for user listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserListQuery {
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped.
    pub offset: usize,
}

/// One page of users with the overall count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    /// Users on this page ordered by creation time.
    pub users: Vec<UserRecord>,
    /// Total number of users.
    pub total: i64,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Lists users ordered by creation time.
    async fn list(&self, query: UserListQuery) -> AppResult<Vec<UserRecord>>;

    /// Counts all users.
    async fn count(&self) -> AppResult<i64>;

    /// Creates a new user. Fails with `Conflict` when the email is taken.
    async fn create(&self, user: NewUser) -> AppResult<UserRecord>;

    /// Updates self-service profile fields.
    async fn update_profile(
        &self,
        user_id: UserId,
        profile: &UserProfileUpdate,
    ) -> AppResult<UserRecord>;

    /// Updates administrator-editable account fields.
    async fn update_account(
        &self,
        user_id: UserId,
        update: &UserAccountUpdate,
    ) -> AppResult<UserRecord>;

    /// Replaces the password hash and clears any lockout.
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()>;

    /// Increments the failed login counter, locking the account until
    /// `locked_until` once the counter reaches `lock_threshold`.
    async fn record_failed_login(
        &self,
        user_id: UserId,
        lock_threshold: i32,
        locked_until: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Clears the failed login counter and lock, and stamps the login time.
    async fn record_successful_login(&self, user_id: UserId) -> AppResult<()>;

    /// Deletes the user together with their grants and reset tokens.
    async fn delete(&self, user_id: UserId) -> AppResult<()>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Credentials are valid and the account may receive a token.
    Authenticated(UserRecord),
    /// Authentication failed. The cause is not disclosed.
    Failed,
}

/// Parameters for self-service registration.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    /// Email address for the new account.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Administrator input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Email address for the new account.
    pub email: String,
    /// Initial plaintext password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the account can log in.
    pub is_active: bool,
}

/// Administrator input for updating an account. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New email address.
    pub email: Option<String>,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New plaintext password.
    pub password: Option<String>,
}

/// Application service for user accounts.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    security_repository: Arc<dyn SecurityAdminRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    default_role: Option<String>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        security_repository: Arc<dyn SecurityAdminRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            security_repository,
            audit_repository,
            default_role: None,
        }
    }

    /// Grants `role` to every self-registered account when the role exists.
    #[must_use]
    pub fn with_default_role(mut self, role: Option<String>) -> Self {
        self.default_role = role.filter(|role| !role.trim().is_empty());
        self
    }

    /// Returns a user record by ID, if it exists.
    pub async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.user_repository.find_by_id(user_id).await
    }

    /// Returns a user record by email, if it exists.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let Ok(email) = EmailAddress::new(email) else {
            return Ok(None);
        };
        self.user_repository.find_by_email(email.as_str()).await
    }

    /// Hashes and discards `password` so failure paths cost the same as a real check.
    fn equalize_timing(&self, password: &str) {
        if let Err(error) = self.password_hasher.hash_password(password) {
            tracing::debug!(error = %error, "timing hash failed");
        }
    }

    async fn require_user(&self, user_id: UserId) -> AppResult<UserRecord> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    async fn append_audit(
        &self,
        actor: &AuthenticatedUser,
        action: AuditAction,
        user_id: UserId,
        detail: Option<String>,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.identity().subject().to_owned(),
                action,
                resource_type: "user".to_owned(),
                resource_id: user_id.to_string(),
                detail,
            })
            .await
    }
}

fn require_users_permission(actor: &AuthenticatedUser, write: bool) -> AppResult<()> {
    let permission = if write {
        SystemPermission::UsersWrite
    } else {
        SystemPermission::UsersRead
    };
    actor.require_permission(permission.as_str())
}
