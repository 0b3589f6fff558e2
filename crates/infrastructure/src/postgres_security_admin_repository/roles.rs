use super::*;

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_roles_impl(&self) -> AppResult<Vec<RoleRecord>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
                roles.id AS role_id,
                roles.name AS role_name,
                roles.description,
                roles.created_at,
                roles.updated_at,
                permissions.name AS permission
            FROM roles
            LEFT JOIN role_permissions ON role_permissions.role_id = roles.id
            LEFT JOIN permissions ON permissions.id = role_permissions.permission_id
            ORDER BY roles.name, permissions.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        Ok(aggregate_roles(rows))
    }

    pub(super) async fn find_role_impl(&self, role_id: RoleId) -> AppResult<Option<RoleRecord>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
                roles.id AS role_id,
                roles.name AS role_name,
                roles.description,
                roles.created_at,
                roles.updated_at,
                permissions.name AS permission
            FROM roles
            LEFT JOIN role_permissions ON role_permissions.role_id = roles.id
            LEFT JOIN permissions ON permissions.id = role_permissions.permission_id
            WHERE roles.id = $1
            ORDER BY permissions.name
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?;

        Ok(aggregate_roles(rows).into_iter().next())
    }

    pub(super) async fn find_role_by_name_impl(&self, name: &str) -> AppResult<Option<RoleRecord>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
                roles.id AS role_id,
                roles.name AS role_name,
                roles.description,
                roles.created_at,
                roles.updated_at,
                permissions.name AS permission
            FROM roles
            LEFT JOIN role_permissions ON role_permissions.role_id = roles.id
            LEFT JOIN permissions ON permissions.id = role_permissions.permission_id
            WHERE roles.name = $1
            ORDER BY permissions.name
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role by name: {error}")))?;

        Ok(aggregate_roles(rows).into_iter().next())
    }

    pub(super) async fn create_role_impl(&self, role: NewRole) -> AppResult<RoleRecord> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let role_id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO roles (name, description)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(role.name.as_str())
        .bind(role.description.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            conflict_or_internal(error, "create role", || {
                format!("role '{}' already exists", role.name)
            })
        })?;

        for permission_id in &role.permission_ids {
            sqlx::query(
                r#"
                INSERT INTO role_permissions (role_id, permission_id)
                VALUES ($1, $2)
                ON CONFLICT (role_id, permission_id) DO NOTHING
                "#,
            )
            .bind(role_id)
            .bind(permission_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| missing_reference_or_internal(error, "link role permission"))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        let role_id = RoleId::from_uuid(role_id);
        self.find_role_impl(role_id)
            .await?
            .ok_or_else(|| role_not_found(role_id))
    }

    pub(super) async fn update_role_impl(
        &self,
        role_id: RoleId,
        name: &RoleName,
        description: &str,
    ) -> AppResult<RoleRecord> {
        let updated = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            UPDATE roles
            SET name = $2, description = $3, updated_at = now()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(name.as_str())
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            conflict_or_internal(error, "update role", || {
                format!("role '{name}' already exists")
            })
        })?;

        if updated.is_none() {
            return Err(role_not_found(role_id));
        }

        self.find_role_impl(role_id)
            .await?
            .ok_or_else(|| role_not_found(role_id))
    }

    pub(super) async fn delete_role_impl(&self, role_id: RoleId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(role_not_found(role_id));
        }

        Ok(())
    }

    pub(super) async fn replace_role_permissions_impl(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<RoleRecord> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let locked = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            UPDATE roles
            SET updated_at = now()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock role: {error}")))?;

        if locked.is_none() {
            return Err(role_not_found(role_id));
        }

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to clear role permissions: {error}"))
            })?;

        for permission_id in permission_ids {
            sqlx::query(
                r#"
                INSERT INTO role_permissions (role_id, permission_id)
                VALUES ($1, $2)
                ON CONFLICT (role_id, permission_id) DO NOTHING
                "#,
            )
            .bind(role_id.as_uuid())
            .bind(permission_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| missing_reference_or_internal(error, "link role permission"))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        self.find_role_impl(role_id)
            .await?
            .ok_or_else(|| role_not_found(role_id))
    }

    pub(super) async fn attach_permission_impl(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            VALUES ($1, $2)
            ON CONFLICT (role_id, permission_id) DO NOTHING
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| missing_reference_or_internal(error, "attach permission"))?;

        Ok(())
    }

    pub(super) async fn detach_permission_impl(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM role_permissions
            WHERE role_id = $1 AND permission_id = $2
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to detach permission: {error}")))?;

        Ok(result.rows_affected() > 0)
    }
}
