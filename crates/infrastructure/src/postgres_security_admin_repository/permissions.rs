use super::*;

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_permissions_impl(&self) -> AppResult<Vec<PermissionRecord>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, resource, action, description, created_at, updated_at
            FROM permissions
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        Ok(rows.into_iter().map(PermissionRecord::from).collect())
    }

    pub(super) async fn find_permission_impl(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionRecord>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, resource, action, description, created_at, updated_at
            FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(permission_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?;

        Ok(row.map(PermissionRecord::from))
    }

    pub(super) async fn find_permissions_by_name_impl(
        &self,
        names: &[String],
    ) -> AppResult<Vec<PermissionRecord>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, resource, action, description, created_at, updated_at
            FROM permissions
            WHERE name = ANY($1)
            ORDER BY name
            "#,
        )
        .bind(names)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find permissions by name: {error}"))
        })?;

        Ok(rows.into_iter().map(PermissionRecord::from).collect())
    }

    pub(super) async fn create_permission_impl(
        &self,
        name: &PermissionName,
        description: &str,
    ) -> AppResult<PermissionRecord> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            INSERT INTO permissions (name, resource, action, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, resource, action, description, created_at, updated_at
            "#,
        )
        .bind(name.as_str())
        .bind(name.resource())
        .bind(name.action())
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            conflict_or_internal(error, "create permission", || {
                format!("permission '{name}' already exists")
            })
        })?;

        Ok(row.into())
    }

    pub(super) async fn update_permission_impl(
        &self,
        permission_id: PermissionId,
        description: &str,
    ) -> AppResult<PermissionRecord> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            UPDATE permissions
            SET description = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, name, resource, action, description, created_at, updated_at
            "#,
        )
        .bind(permission_id.as_uuid())
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update permission: {error}")))?;

        row.map(PermissionRecord::from)
            .ok_or_else(|| permission_not_found(permission_id))
    }

    pub(super) async fn delete_permission_impl(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(permission_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete permission: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(permission_not_found(permission_id));
        }

        Ok(())
    }
}
