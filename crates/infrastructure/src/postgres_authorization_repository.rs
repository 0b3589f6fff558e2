use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use rolegate_application::AuthorizationRepository;
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{RoleGrant, RoleId, UserId};

/// PostgreSQL-backed repository for access resolution lookups.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct RoleGrantRow {
    role_id: uuid::Uuid,
    role_name: String,
    granted_at: DateTime<Utc>,
    granted_by: Option<uuid::Uuid>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<RoleGrantRow> for RoleGrant {
    fn from(row: RoleGrantRow) -> Self {
        Self {
            role_id: RoleId::from_uuid(row.role_id),
            role_name: row.role_name,
            granted_at: row.granted_at,
            granted_by: row.granted_by.map(UserId::from_uuid),
            expires_at: row.expires_at,
        }
    }
}

/// Loads every grant of a user, expired ones included, ordered by role name.
pub(crate) async fn fetch_role_grants(pool: &PgPool, user_id: UserId) -> AppResult<Vec<RoleGrant>> {
    let rows = sqlx::query_as::<_, RoleGrantRow>(
        r#"
        SELECT
            user_roles.role_id,
            roles.name AS role_name,
            user_roles.granted_at,
            user_roles.granted_by,
            user_roles.expires_at
        FROM user_roles
        INNER JOIN roles ON roles.id = user_roles.role_id
        WHERE user_roles.user_id = $1
        ORDER BY roles.name
        "#,
    )
    .bind(user_id.as_uuid())
    .fetch_all(pool)
    .await
    .map_err(|error| AppError::Internal(format!("failed to load role grants: {error}")))?;

    Ok(rows.into_iter().map(RoleGrant::from).collect())
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn list_role_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleGrant>> {
        fetch_role_grants(&self.pool, user_id).await
    }

    async fn list_permission_names_for_roles(
        &self,
        role_ids: &[RoleId],
    ) -> AppResult<Vec<String>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let role_ids = role_ids.iter().map(RoleId::as_uuid).collect::<Vec<_>>();

        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT permissions.name
            FROM role_permissions
            INNER JOIN permissions ON permissions.id = role_permissions.permission_id
            WHERE role_permissions.role_id = ANY($1)
            ORDER BY permissions.name
            "#,
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load role permissions: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rolegate_application::{
        AuthorizationRepository, AuthorizationService, NewRole, NewUser, SecurityAdminRepository,
        UserRepository,
    };
    use rolegate_domain::{PermissionName, RoleName};

    use super::PostgresAuthorizationRepository;
    use crate::test_database::{test_pool, unique_email, unique_name};
    use crate::{PostgresSecurityAdminRepository, PostgresUserRepository};

    #[tokio::test]
    async fn resolves_only_active_grants_into_access() {
        let Some(pool) = test_pool().await else {
            return;
        };

        let users = PostgresUserRepository::new(pool.clone());
        let security = PostgresSecurityAdminRepository::new(pool.clone());
        let authorization = PostgresAuthorizationRepository::new(pool);

        let user = users
            .create(NewUser {
                email: unique_email("resolve"),
                password_hash: "$argon2id$placeholder".to_owned(),
                first_name: String::new(),
                last_name: String::new(),
                is_active: true,
            })
            .await
            .unwrap_or_else(|error| panic!("user should be created: {error}"));

        let resource = unique_name("reports");
        let read = PermissionName::from_parts(resource.as_str(), "read")
            .unwrap_or_else(|error| panic!("permission name should be valid: {error}"));
        let export = PermissionName::from_parts(resource.as_str(), "export")
            .unwrap_or_else(|error| panic!("permission name should be valid: {error}"));
        let read = security
            .create_permission(&read, "")
            .await
            .unwrap_or_else(|error| panic!("permission should be created: {error}"));
        let export = security
            .create_permission(&export, "")
            .await
            .unwrap_or_else(|error| panic!("permission should be created: {error}"));

        let mut roles = Vec::new();
        for (prefix, permission) in [("analyst", read.id), ("exporter", export.id)] {
            let name = RoleName::new(unique_name(prefix))
                .unwrap_or_else(|error| panic!("role name should be valid: {error}"));
            let role = security
                .create_role(NewRole {
                    name,
                    description: String::new(),
                    permission_ids: vec![permission],
                })
                .await
                .unwrap_or_else(|error| panic!("role should be created: {error}"));
            roles.push(role);
        }

        let granted = security
            .grant_role(user.id, roles[0].id, None, None)
            .await;
        assert!(granted.is_ok());
        let expired = security
            .grant_role(
                user.id,
                roles[1].id,
                None,
                Some(Utc::now() - Duration::minutes(1)),
            )
            .await;
        assert!(expired.is_ok());

        let grants = authorization
            .list_role_grants_for_user(user.id)
            .await
            .unwrap_or_default();
        assert_eq!(grants.len(), 2);

        let service = AuthorizationService::new(std::sync::Arc::new(authorization));
        let access = service.resolve_access(user.id).await;

        assert!(access.has_role(roles[0].name.as_str()));
        assert!(!access.has_role(roles[1].name.as_str()));
        assert!(access.has_permission(read.name.as_str()));
        assert!(!access.has_permission(export.name.as_str()));
    }

    #[tokio::test]
    async fn empty_role_list_has_no_permissions() {
        let Some(pool) = test_pool().await else {
            return;
        };

        let authorization = PostgresAuthorizationRepository::new(pool);
        let names = authorization
            .list_permission_names_for_roles(&[])
            .await
            .unwrap_or_else(|error| panic!("lookup should succeed: {error}"));

        assert!(names.is_empty());
    }
}
