//! Administration of roles, permissions and role grants.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{
    AuditAction, PermissionId, PermissionName, RoleGrant, RoleId, RoleName, SystemPermission,
    UserId,
};

use crate::security_admin_ports::{NewRole, PermissionRecord, RoleRecord, SecurityAdminRepository};
use crate::{AuditEvent, AuditRepository, AuthenticatedUser, UserRepository};

mod assignments;
mod permissions;
mod roles;


/// Input payload for creating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Names of permissions to link.
    pub permissions: Vec<String>,
}

/// Input payload for updating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New unique role name.
    pub name: String,
    /// New description.
    pub description: String,
}

/// Input payload for creating a permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionInput {
    /// Permission name in `resource.action` form.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

/// Input payload for granting a role to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRoleInput {
    /// Role to grant.
    pub role_id: RoleId,
    /// Optional expiry. Must be in the future.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Application service for security administration.
#[derive(Clone)]
pub struct SecurityAdminService {
    repository: Arc<dyn SecurityAdminRepository>,
    user_repository: Arc<dyn UserRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SecurityAdminService {
    /// Creates a new security admin service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn SecurityAdminRepository>,
        user_repository: Arc<dyn UserRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            repository,
            user_repository,
            audit_repository,
        }
    }

    async fn append_audit(
        &self,
        actor: &AuthenticatedUser,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: Option<String>,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.identity().subject().to_owned(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail,
            })
            .await
    }

    async fn require_role_record(&self, role_id: RoleId) -> AppResult<RoleRecord> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    async fn require_permission_record(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<PermissionRecord> {
        self.repository
            .find_permission(permission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_id}' does not exist"))
            })
    }

    /// Maps permission names to ids, rejecting names that are not in the catalog.
    async fn resolve_permission_ids(&self, names: &[String]) -> AppResult<Vec<PermissionId>> {
        let requested = names
            .iter()
            .map(|name| PermissionName::new(name.as_str()).map(|name| name.as_str().to_owned()))
            .collect::<AppResult<BTreeSet<String>>>()?;

        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let requested: Vec<String> = requested.into_iter().collect();
        let found = self.repository.find_permissions_by_name(&requested).await?;

        let unknown: Vec<&str> = requested
            .iter()
            .filter(|name| !found.iter().any(|permission| &permission.name == *name))
            .map(String::as_str)
            .collect();

        if !unknown.is_empty() {
            return Err(AppError::Validation(format!(
                "unknown permissions: {}",
                unknown.join(", ")
            )));
        }

        Ok(found.into_iter().map(|permission| permission.id).collect())
    }
}

fn require_roles_permission(actor: &AuthenticatedUser, write: bool) -> AppResult<()> {
    let permission = if write {
        SystemPermission::RolesWrite
    } else {
        SystemPermission::RolesRead
    };
    actor.require_permission(permission.as_str())
}

fn require_permissions_permission(actor: &AuthenticatedUser, write: bool) -> AppResult<()> {
    let permission = if write {
        SystemPermission::PermissionsWrite
    } else {
        SystemPermission::PermissionsRead
    };
    actor.require_permission(permission.as_str())
}
