//! PostgreSQL-backed role, permission and grant administration.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use rolegate_application::{NewRole, PermissionRecord, RoleRecord, SecurityAdminRepository};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{PermissionId, PermissionName, RoleGrant, RoleId, RoleName, UserId};

use crate::conflict_or_internal;
use crate::postgres_authorization_repository::{RoleGrantRow, fetch_role_grants};

mod assignments;
mod permissions;
mod roles;


/// PostgreSQL-backed repository for role administration.
#[derive(Clone)]
pub struct PostgresSecurityAdminRepository {
    pool: PgPool,
}

impl PostgresSecurityAdminRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// One role joined with one of its permissions, or none.
#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: uuid::Uuid,
    role_name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    permission: Option<String>,
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: uuid::Uuid,
    name: String,
    resource: String,
    action: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PermissionRow> for PermissionRecord {
    fn from(row: PermissionRow) -> Self {
        Self {
            id: PermissionId::from_uuid(row.id),
            name: row.name,
            resource: row.resource,
            action: row.action,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Folds joined rows into roles. Rows must be ordered by role name, then permission.
fn aggregate_roles(rows: Vec<RoleRow>) -> Vec<RoleRecord> {
    let mut roles: Vec<RoleRecord> = Vec::new();

    for row in rows {
        let role_id = RoleId::from_uuid(row.role_id);
        let starts_new_role = roles.last().is_none_or(|role| role.id != role_id);
        if starts_new_role {
            roles.push(RoleRecord {
                id: role_id,
                name: row.role_name,
                description: row.description,
                permissions: Vec::new(),
                created_at: row.created_at,
                updated_at: row.updated_at,
            });
        }

        if let (Some(permission), Some(role)) = (row.permission, roles.last_mut()) {
            role.permissions.push(permission);
        }
    }

    roles
}

fn role_not_found(role_id: RoleId) -> AppError {
    AppError::NotFound(format!("role '{role_id}' does not exist"))
}

fn permission_not_found(permission_id: PermissionId) -> AppError {
    AppError::NotFound(format!("permission '{permission_id}' does not exist"))
}

// A foreign key violation here means the referenced row was deleted concurrently.
fn missing_reference_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::NotFound(format!("cannot {operation}: referenced record does not exist"));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

#[async_trait]
impl SecurityAdminRepository for PostgresSecurityAdminRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        self.list_roles_impl().await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleRecord>> {
        self.find_role_impl(role_id).await
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleRecord>> {
        self.find_role_by_name_impl(name).await
    }

    async fn create_role(&self, role: NewRole) -> AppResult<RoleRecord> {
        self.create_role_impl(role).await
    }

    async fn update_role(
        &self,
        role_id: RoleId,
        name: &RoleName,
        description: &str,
    ) -> AppResult<RoleRecord> {
        self.update_role_impl(role_id, name, description).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.delete_role_impl(role_id).await
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<RoleRecord> {
        self.replace_role_permissions_impl(role_id, permission_ids)
            .await
    }

    async fn attach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.attach_permission_impl(role_id, permission_id).await
    }

    async fn detach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        self.detach_permission_impl(role_id, permission_id).await
    }

    async fn list_permissions(&self) -> AppResult<Vec<PermissionRecord>> {
        self.list_permissions_impl().await
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionRecord>> {
        self.find_permission_impl(permission_id).await
    }

    async fn find_permissions_by_name(&self, names: &[String]) -> AppResult<Vec<PermissionRecord>> {
        self.find_permissions_by_name_impl(names).await
    }

    async fn create_permission(
        &self,
        name: &PermissionName,
        description: &str,
    ) -> AppResult<PermissionRecord> {
        self.create_permission_impl(name, description).await
    }

    async fn update_permission(
        &self,
        permission_id: PermissionId,
        description: &str,
    ) -> AppResult<PermissionRecord> {
        self.update_permission_impl(permission_id, description)
            .await
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.delete_permission_impl(permission_id).await
    }

    async fn list_user_grants(&self, user_id: UserId) -> AppResult<Vec<RoleGrant>> {
        fetch_role_grants(&self.pool, user_id).await
    }

    async fn grant_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        granted_by: Option<UserId>,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<RoleGrant> {
        self.grant_role_impl(user_id, role_id, granted_by, expires_at)
            .await
    }

    async fn revoke_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        self.revoke_role_impl(user_id, role_id).await
    }
}
