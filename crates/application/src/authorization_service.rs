//! Role and permission resolution plus request-level access decisions.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rolegate_core::{AppError, AppResult, UserIdentity};
use rolegate_domain::{AccessContext, AccessRequirement, RoleGrant, RoleId, RoleMatch, UserId};

mod resolution;


/// Repository port for the lookups behind access resolution.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Lists every role grant held by the user, expired ones included.
    async fn list_role_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleGrant>>;

    /// Lists the distinct permission names linked to any of the roles.
    async fn list_permission_names_for_roles(&self, role_ids: &[RoleId])
    -> AppResult<Vec<String>>;
}

/// Caller of an authenticated request with its access resolved for that request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: UserId,
    identity: UserIdentity,
    access: AccessContext,
}

impl AuthenticatedUser {
    /// Creates an authenticated caller.
    #[must_use]
    pub fn new(user_id: UserId, identity: UserIdentity, access: AccessContext) -> Self {
        Self {
            user_id,
            identity,
            access,
        }
    }

    /// Returns the caller's user id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the caller's identity.
    #[must_use]
    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Returns the roles and permissions resolved for this request.
    #[must_use]
    pub fn access(&self) -> &AccessContext {
        &self.access
    }

    /// Fails with `Forbidden` unless the requirement is met.
    pub fn require(&self, requirement: &AccessRequirement) -> AppResult<()> {
        if requirement.evaluate(&self.access) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' requires {}",
            self.identity.subject(),
            requirement.describe()
        )))
    }

    /// Fails with `Forbidden` unless the permission is held.
    pub fn require_permission(&self, permission: &str) -> AppResult<()> {
        self.require(&AccessRequirement::permission(permission))
    }

    /// Fails with `Forbidden` unless the role is held.
    pub fn require_role(&self, role: &str) -> AppResult<()> {
        self.require(&AccessRequirement::role(role))
    }

    /// Fails with `Forbidden` unless the roles are held under `mode`.
    pub fn require_roles(&self, roles: &[&str], mode: RoleMatch) -> AppResult<()> {
        self.require(&AccessRequirement::Roles {
            roles: roles.iter().map(|role| (*role).to_owned()).collect(),
            mode,
        })
    }
}

/// Application service resolving effective roles and permissions.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Resolves the user's effective access as of now.
    pub async fn resolve_access(&self, user_id: UserId) -> AccessContext {
        self.resolve_access_at(user_id, Utc::now()).await
    }

    /// Resolves the user's effective access as of `now`.
    ///
    /// Lookup failures yield an empty context instead of an error. The empty
    /// context satisfies no positive requirement, so the decision still fails
    /// closed.
    pub async fn resolve_access_at(&self, user_id: UserId, now: DateTime<Utc>) -> AccessContext {
        match self.try_resolve_access_at(user_id, now).await {
            Ok(context) => context,
            Err(error) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %error,
                    "role resolution failed, continuing with no roles"
                );
                AccessContext::empty()
            }
        }
    }

    /// Lists active role grants of the user as of `now`.
    pub async fn list_active_grants(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<RoleGrant>> {
        let grants = self.repository.list_role_grants_for_user(user_id).await?;
        Ok(resolution::active_grants(grants, now))
    }
}
