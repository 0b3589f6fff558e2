//! Roles, permissions and grant records.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rolegate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{RoleId, UserId};

/// Maximum accepted role name length.
pub const ROLE_NAME_MAX_LENGTH: usize = 64;

/// Validated role name: lowercase ASCII letters, digits, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleName(String);

impl RoleName {
    /// Creates a validated role name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_owned();

        if value.is_empty() {
            return Err(AppError::Validation("role name must not be empty".to_owned()));
        }

        if value.len() > ROLE_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role name must not exceed {ROLE_NAME_MAX_LENGTH} characters"
            )));
        }

        if !value
            .chars()
            .all(|character| matches!(character, 'a'..='z' | '0'..='9' | '_' | '-'))
        {
            return Err(AppError::Validation(format!(
                "role name '{value}' may only contain lowercase letters, digits, '_' and '-'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the role name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RoleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

/// Validated permission name of the form `resource.action`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionName {
    name: String,
    separator: usize,
}

impl PermissionName {
    /// Creates a permission name from its combined `resource.action` form.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let name = value.into().trim().to_owned();
        let Some((resource, action)) = name.split_once('.') else {
            return Err(AppError::Validation(format!(
                "permission '{name}' must have the form 'resource.action'"
            )));
        };

        validate_permission_segment(&name, "resource", resource)?;
        validate_permission_segment(&name, "action", action)?;

        let separator = resource.len();
        Ok(Self { name, separator })
    }

    /// Creates a permission name from separate resource and action parts.
    pub fn from_parts(resource: &str, action: &str) -> AppResult<Self> {
        Self::new(format!("{}.{}", resource.trim(), action.trim()))
    }

    /// Returns the combined permission name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the resource segment.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.name[..self.separator]
    }

    /// Returns the action segment.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.name[self.separator + 1..]
    }
}

impl Display for PermissionName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.name)
    }
}

fn validate_permission_segment(name: &str, label: &str, segment: &str) -> AppResult<()> {
    if segment.is_empty() {
        return Err(AppError::Validation(format!(
            "permission '{name}' has an empty {label}"
        )));
    }

    if !segment
        .chars()
        .all(|character| matches!(character, 'a'..='z' | '0'..='9' | '_'))
    {
        return Err(AppError::Validation(format!(
            "permission '{name}' {label} may only contain lowercase letters, digits and '_'"
        )));
    }

    Ok(())
}

/// Built-in permissions guarding the administration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    /// Allows listing and reading user accounts.
    UsersRead,
    /// Allows creating, updating and deleting user accounts.
    UsersWrite,
    /// Allows reading roles and role grants.
    RolesRead,
    /// Allows managing roles, their permissions and grants.
    RolesWrite,
    /// Allows reading the permission catalog.
    PermissionsRead,
    /// Allows managing the permission catalog.
    PermissionsWrite,
    /// Allows reading email templates.
    EmailTemplatesRead,
    /// Allows managing email templates.
    EmailTemplatesWrite,
    /// Allows reading audit log entries.
    AuditRead,
}

impl SystemPermission {
    /// Returns the stored permission name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsersRead => "users.read",
            Self::UsersWrite => "users.write",
            Self::RolesRead => "roles.read",
            Self::RolesWrite => "roles.write",
            Self::PermissionsRead => "permissions.read",
            Self::PermissionsWrite => "permissions.write",
            Self::EmailTemplatesRead => "email_templates.read",
            Self::EmailTemplatesWrite => "email_templates.write",
            Self::AuditRead => "audit.read",
        }
    }

    /// Returns every built-in permission.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[SystemPermission] = &[
            SystemPermission::UsersRead,
            SystemPermission::UsersWrite,
            SystemPermission::RolesRead,
            SystemPermission::RolesWrite,
            SystemPermission::PermissionsRead,
            SystemPermission::PermissionsWrite,
            SystemPermission::EmailTemplatesRead,
            SystemPermission::EmailTemplatesWrite,
            SystemPermission::AuditRead,
        ];

        ALL
    }
}

impl FromStr for SystemPermission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown system permission '{value}'")))
    }
}

/// One role assignment held by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    /// Granted role.
    pub role_id: RoleId,
    /// Granted role name.
    pub role_name: String,
    /// When the grant was first made.
    pub granted_at: DateTime<Utc>,
    /// Who made the grant, if recorded.
    pub granted_by: Option<UserId>,
    /// When the grant stops applying. `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl RoleGrant {
    /// Returns whether the grant applies at `now`.
    ///
    /// A grant whose expiry equals `now` is already inactive.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A user account was created by an administrator.
    UserCreated,
    /// A user account was updated by an administrator.
    UserUpdated,
    /// A user account was deleted.
    UserDeleted,
    /// A role was created.
    RoleCreated,
    /// A role was renamed or redescribed.
    RoleUpdated,
    /// A role and its grants were deleted.
    RoleDeleted,
    /// A role was granted to a user.
    RoleAssigned,
    /// A role was revoked from a user.
    RoleUnassigned,
    /// A permission was created.
    PermissionCreated,
    /// A permission description changed.
    PermissionUpdated,
    /// A permission was deleted.
    PermissionDeleted,
    /// A permission was linked to a role.
    PermissionAttached,
    /// A permission was unlinked from a role.
    PermissionDetached,
    /// An email template was created.
    EmailTemplateCreated,
    /// An email template was updated.
    EmailTemplateUpdated,
    /// An email template was deleted.
    EmailTemplateDeleted,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserCreated => "user.created",
            Self::UserUpdated => "user.updated",
            Self::UserDeleted => "user.deleted",
            Self::RoleCreated => "role.created",
            Self::RoleUpdated => "role.updated",
            Self::RoleDeleted => "role.deleted",
            Self::RoleAssigned => "role.assigned",
            Self::RoleUnassigned => "role.unassigned",
            Self::PermissionCreated => "permission.created",
            Self::PermissionUpdated => "permission.updated",
            Self::PermissionDeleted => "permission.deleted",
            Self::PermissionAttached => "permission.attached",
            Self::PermissionDetached => "permission.detached",
            Self::EmailTemplateCreated => "email_template.created",
            Self::EmailTemplateUpdated => "email_template.updated",
            Self::EmailTemplateDeleted => "email_template.deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{Duration, Utc};

    use super::{PermissionName, RoleGrant, RoleName, SystemPermission};
    use crate::RoleId;

    fn grant(expires_in: Option<Duration>) -> RoleGrant {
        let now = Utc::now();
        RoleGrant {
            role_id: RoleId::new(),
            role_name: "editor".to_owned(),
            granted_at: now,
            granted_by: None,
            expires_at: expires_in.map(|offset| now + offset),
        }
    }

    #[test]
    fn permission_name_exposes_segments() {
        let name = PermissionName::new("email_templates.write")
            .unwrap_or_else(|_| panic!("valid permission"));
        assert_eq!(name.resource(), "email_templates");
        assert_eq!(name.action(), "write");
    }

    #[test]
    fn permission_name_requires_both_segments() {
        assert!(PermissionName::new("users").is_err());
        assert!(PermissionName::new(".read").is_err());
        assert!(PermissionName::new("users.").is_err());
        assert!(PermissionName::new("users.read.all").is_err());
        assert!(PermissionName::new("Users.Read").is_err());
    }

    #[test]
    fn role_name_rejects_spaces_and_uppercase() {
        assert!(RoleName::new("super admin").is_err());
        assert!(RoleName::new("Admin").is_err());
        assert!(RoleName::new("support-tier_2").is_ok());
    }

    #[test]
    fn system_permission_roundtrip_storage_value() {
        for permission in SystemPermission::all() {
            let restored = SystemPermission::from_str(permission.as_str());
            assert_eq!(restored.ok(), Some(*permission));
            assert!(PermissionName::new(permission.as_str()).is_ok());
        }
    }

    #[test]
    fn grant_without_expiry_is_always_active() {
        assert!(grant(None).is_active_at(Utc::now() + Duration::days(3650)));
    }

    #[test]
    fn grant_is_inactive_from_its_expiry_instant() {
        let grant = grant(Some(Duration::hours(1)));
        let expires_at = grant.expires_at.unwrap_or_else(|| unreachable!());
        assert!(grant.is_active_at(expires_at - Duration::seconds(1)));
        assert!(!grant.is_active_at(expires_at));
        assert!(!grant.is_active_at(expires_at + Duration::seconds(1)));
    }
}
