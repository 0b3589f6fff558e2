//! Access decisions over a resolved set of roles and permissions.
//!
//! Decisions are exact string matches. There are no wildcards and no role
//! hierarchy: a role or permission counts only when it was granted explicitly.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// How a multi-element requirement is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleMatch {
    /// At least one required element must be held. An empty requirement denies.
    Any,
    /// Every required element must be held. An empty requirement allows.
    All,
}

impl RoleMatch {
    fn evaluate<'a>(
        self,
        held: &BTreeSet<String>,
        required: impl IntoIterator<Item = &'a str>,
    ) -> bool {
        let mut required = required.into_iter();
        match self {
            Self::Any => required.any(|name| held.contains(name)),
            Self::All => required.all(|name| held.contains(name)),
        }
    }
}

/// Effective roles and permissions of one subject at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    roles: BTreeSet<String>,
    permissions: BTreeSet<String>,
}

impl AccessContext {
    /// Creates a context from resolved role and permission names.
    #[must_use]
    pub fn new(
        roles: impl IntoIterator<Item = String>,
        permissions: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            roles: roles.into_iter().collect(),
            permissions: permissions.into_iter().collect(),
        }
    }

    /// A context holding nothing. Every positive check against it denies.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the held role names in sorted order.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Returns the held permission names in sorted order.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    /// Returns whether the role is held.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns whether the permission is held.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Checks several roles at once.
    #[must_use]
    pub fn has_roles<S: AsRef<str>>(&self, roles: &[S], mode: RoleMatch) -> bool {
        mode.evaluate(&self.roles, roles.iter().map(AsRef::as_ref))
    }

    /// Checks several permissions at once.
    #[must_use]
    pub fn has_permissions<S: AsRef<str>>(&self, permissions: &[S], mode: RoleMatch) -> bool {
        mode.evaluate(&self.permissions, permissions.iter().map(AsRef::as_ref))
    }
}

/// A requirement that can be attached to a route group or checked in a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessRequirement {
    /// A single permission must be held.
    Permission {
        /// Required permission name.
        permission: String,
    },
    /// A single role must be held.
    Role {
        /// Required role name.
        role: String,
    },
    /// A set of roles combined with `mode`.
    Roles {
        /// Required role names.
        roles: Vec<String>,
        /// Combination mode.
        mode: RoleMatch,
    },
    /// A set of permissions combined with `mode`.
    Permissions {
        /// Required permission names.
        permissions: Vec<String>,
        /// Combination mode.
        mode: RoleMatch,
    },
}

impl AccessRequirement {
    /// Requires one permission.
    #[must_use]
    pub fn permission(permission: impl Into<String>) -> Self {
        Self::Permission {
            permission: permission.into(),
        }
    }

    /// Requires one role.
    #[must_use]
    pub fn role(role: impl Into<String>) -> Self {
        Self::Role { role: role.into() }
    }

    /// Requires at least one of the roles.
    #[must_use]
    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Roles {
            roles: roles.into_iter().map(Into::into).collect(),
            mode: RoleMatch::Any,
        }
    }

    /// Requires every one of the roles.
    #[must_use]
    pub fn all_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Roles {
            roles: roles.into_iter().map(Into::into).collect(),
            mode: RoleMatch::All,
        }
    }

    /// Returns whether `context` satisfies this requirement.
    #[must_use]
    pub fn evaluate(&self, context: &AccessContext) -> bool {
        match self {
            Self::Permission { permission } => context.has_permission(permission),
            Self::Role { role } => context.has_role(role),
            Self::Roles { roles, mode } => context.has_roles(roles, *mode),
            Self::Permissions { permissions, mode } => context.has_permissions(permissions, *mode),
        }
    }

    /// Human-readable description used in denial messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Permission { permission } => format!("permission '{permission}'"),
            Self::Role { role } => format!("role '{role}'"),
            Self::Roles { roles, mode } => describe_set("roles", roles, *mode),
            Self::Permissions { permissions, mode } => {
                describe_set("permissions", permissions, *mode)
            }
        }
    }
}

fn describe_set(label: &str, names: &[String], mode: RoleMatch) -> String {
    let quantifier = match mode {
        RoleMatch::Any => "any of",
        RoleMatch::All => "all of",
    };

    format!("{quantifier} {label} [{}]", names.join(", "))
}
