use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rolegate_core::AppResult;
use rolegate_domain::{PermissionId, PermissionName, RoleGrant, RoleId, RoleName, UserId};

/// Role definition returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    /// Stable role identifier.
    pub id: RoleId,
    /// Unique role name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Names of the permissions linked to the role, sorted.
    pub permissions: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Permission definition returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRecord {
    /// Stable permission identifier.
    pub id: PermissionId,
    /// Unique `resource.action` name.
    pub name: String,
    /// Resource segment of the name.
    pub resource: String,
    /// Action segment of the name.
    pub action: String,
    /// Free-form description.
    pub description: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for inserting a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Unique role name.
    pub name: RoleName,
    /// Free-form description.
    pub description: String,
    /// Permissions linked on creation.
    pub permission_ids: Vec<PermissionId>,
}

/// Repository port for role, permission and grant administration.
#[async_trait]
pub trait SecurityAdminRepository: Send + Sync {
    /// Lists every role with its permission names, ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>>;

    /// Finds a role by id.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleRecord>>;

    /// Finds a role by its unique name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleRecord>>;

    /// Inserts a role and its permission links atomically.
    async fn create_role(&self, role: NewRole) -> AppResult<RoleRecord>;

    /// Renames or redescribes a role.
    async fn update_role(
        &self,
        role_id: RoleId,
        name: &RoleName,
        description: &str,
    ) -> AppResult<RoleRecord>;

    /// Deletes a role. Grants and permission links go with it.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Replaces the complete permission set of a role atomically.
    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<RoleRecord>;

    /// Links a permission to a role. Linking twice is a no-op.
    async fn attach_permission(&self, role_id: RoleId, permission_id: PermissionId)
    -> AppResult<()>;

    /// Unlinks a permission from a role. Returns whether a link existed.
    async fn detach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool>;

    /// Lists the permission catalog ordered by name.
    async fn list_permissions(&self) -> AppResult<Vec<PermissionRecord>>;

    /// Finds a permission by id.
    async fn find_permission(&self, permission_id: PermissionId)
    -> AppResult<Option<PermissionRecord>>;

    /// Finds every permission whose name is in `names`.
    async fn find_permissions_by_name(&self, names: &[String])
    -> AppResult<Vec<PermissionRecord>>;

    /// Inserts a permission.
    async fn create_permission(
        &self,
        name: &PermissionName,
        description: &str,
    ) -> AppResult<PermissionRecord>;

    /// Updates a permission description.
    async fn update_permission(
        &self,
        permission_id: PermissionId,
        description: &str,
    ) -> AppResult<PermissionRecord>;

    /// Deletes a permission and its role links.
    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()>;

    /// Lists every grant held by a user, expired ones included.
    async fn list_user_grants(&self, user_id: UserId) -> AppResult<Vec<RoleGrant>>;

    /// Grants a role to a user.
    ///
    /// Granting a held role again refreshes grantor and expiry and keeps the
    /// original grant time.
    async fn grant_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        granted_by: Option<UserId>,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<RoleGrant>;

    /// Revokes a role from a user. Returns whether a grant existed.
    async fn revoke_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool>;
}
