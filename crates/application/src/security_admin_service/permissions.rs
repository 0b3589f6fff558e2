use super::*;

impl SecurityAdminService {
    /// Lists the permission catalog.
    pub async fn list_permissions(
        &self,
        actor: &AuthenticatedUser,
    ) -> AppResult<Vec<PermissionRecord>> {
        require_permissions_permission(actor, false)?;
        self.repository.list_permissions().await
    }

    /// Returns one permission.
    pub async fn get_permission(
        &self,
        actor: &AuthenticatedUser,
        permission_id: PermissionId,
    ) -> AppResult<PermissionRecord> {
        require_permissions_permission(actor, false)?;
        self.require_permission_record(permission_id).await
    }

    /// Adds a permission to the catalog.
    pub async fn create_permission(
        &self,
        actor: &AuthenticatedUser,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionRecord> {
        require_permissions_permission(actor, true)?;

        let name = PermissionName::new(input.name)?;
        let permission = self
            .repository
            .create_permission(&name, input.description.trim())
            .await?;

        self.append_audit(
            actor,
            AuditAction::PermissionCreated,
            "permission",
            permission.id.to_string(),
            Some(permission.name.clone()),
        )
        .await?;

        Ok(permission)
    }

    /// Updates a permission description. Names are immutable.
    pub async fn update_permission(
        &self,
        actor: &AuthenticatedUser,
        permission_id: PermissionId,
        description: &str,
    ) -> AppResult<PermissionRecord> {
        require_permissions_permission(actor, true)?;

        let permission = self
            .repository
            .update_permission(permission_id, description.trim())
            .await?;

        self.append_audit(
            actor,
            AuditAction::PermissionUpdated,
            "permission",
            permission.id.to_string(),
            Some(permission.name.clone()),
        )
        .await?;

        Ok(permission)
    }

    /// Removes a permission from the catalog and from every role.
    ///
    /// Built-in permissions guard this very surface and cannot be deleted.
    pub async fn delete_permission(
        &self,
        actor: &AuthenticatedUser,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        require_permissions_permission(actor, true)?;

        let permission = self.require_permission_record(permission_id).await?;
        if permission.name.parse::<SystemPermission>().is_ok() {
            return Err(AppError::Conflict(format!(
                "built-in permission '{}' cannot be deleted",
                permission.name
            )));
        }

        self.repository.delete_permission(permission_id).await?;

        self.append_audit(
            actor,
            AuditAction::PermissionDeleted,
            "permission",
            permission_id.to_string(),
            Some(permission.name),
        )
        .await
    }
}
