use super::*;

impl SecurityAdminService {
    /// Lists roles with their permission names.
    pub async fn list_roles(&self, actor: &AuthenticatedUser) -> AppResult<Vec<RoleRecord>> {
        require_roles_permission(actor, false)?;
        self.repository.list_roles().await
    }

    /// Returns one role with its permission names.
    pub async fn get_role(
        &self,
        actor: &AuthenticatedUser,
        role_id: RoleId,
    ) -> AppResult<RoleRecord> {
        require_roles_permission(actor, false)?;
        self.require_role_record(role_id).await
    }

    /// Creates a role, optionally linking catalog permissions.
    pub async fn create_role(
        &self,
        actor: &AuthenticatedUser,
        input: CreateRoleInput,
    ) -> AppResult<RoleRecord> {
        require_roles_permission(actor, true)?;

        let name = RoleName::new(input.name)?;
        let permission_ids = self.resolve_permission_ids(&input.permissions).await?;

        let role = self
            .repository
            .create_role(NewRole {
                name,
                description: input.description.trim().to_owned(),
                permission_ids,
            })
            .await?;

        self.append_audit(
            actor,
            AuditAction::RoleCreated,
            "role",
            role.id.to_string(),
            Some(role.name.clone()),
        )
        .await?;

        Ok(role)
    }

    /// Renames or redescribes a role.
    pub async fn update_role(
        &self,
        actor: &AuthenticatedUser,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<RoleRecord> {
        require_roles_permission(actor, true)?;

        let name = RoleName::new(input.name)?;
        let role = self
            .repository
            .update_role(role_id, &name, input.description.trim())
            .await?;

        self.append_audit(
            actor,
            AuditAction::RoleUpdated,
            "role",
            role.id.to_string(),
            Some(role.name.clone()),
        )
        .await?;

        Ok(role)
    }

    /// Deletes a role together with all of its grants and permission links.
    pub async fn delete_role(&self, actor: &AuthenticatedUser, role_id: RoleId) -> AppResult<()> {
        require_roles_permission(actor, true)?;

        let role = self.require_role_record(role_id).await?;
        self.repository.delete_role(role_id).await?;

        self.append_audit(
            actor,
            AuditAction::RoleDeleted,
            "role",
            role_id.to_string(),
            Some(role.name),
        )
        .await
    }

    /// Replaces the full permission set of a role.
    pub async fn set_role_permissions(
        &self,
        actor: &AuthenticatedUser,
        role_id: RoleId,
        permissions: Vec<String>,
    ) -> AppResult<RoleRecord> {
        require_roles_permission(actor, true)?;

        self.require_role_record(role_id).await?;
        let permission_ids = self.resolve_permission_ids(&permissions).await?;
        let role = self
            .repository
            .replace_role_permissions(role_id, &permission_ids)
            .await?;

        self.append_audit(
            actor,
            AuditAction::PermissionAttached,
            "role",
            role_id.to_string(),
            Some(format!("permissions replaced: [{}]", role.permissions.join(", "))),
        )
        .await?;

        Ok(role)
    }

    /// Links one permission to a role.
    pub async fn attach_permission(
        &self,
        actor: &AuthenticatedUser,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RoleRecord> {
        require_roles_permission(actor, true)?;

        self.require_role_record(role_id).await?;
        let permission = self.require_permission_record(permission_id).await?;
        self.repository
            .attach_permission(role_id, permission_id)
            .await?;

        self.append_audit(
            actor,
            AuditAction::PermissionAttached,
            "role",
            role_id.to_string(),
            Some(permission.name),
        )
        .await?;

        self.require_role_record(role_id).await
    }

    /// Unlinks one permission from a role.
    pub async fn detach_permission(
        &self,
        actor: &AuthenticatedUser,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RoleRecord> {
        require_roles_permission(actor, true)?;

        self.require_role_record(role_id).await?;
        let permission = self.require_permission_record(permission_id).await?;
        let detached = self
            .repository
            .detach_permission(role_id, permission_id)
            .await?;

        if !detached {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not hold permission '{}'",
                permission.name
            )));
        }

        self.append_audit(
            actor,
            AuditAction::PermissionDetached,
            "role",
            role_id.to_string(),
            Some(permission.name),
        )
        .await?;

        self.require_role_record(role_id).await
    }
}
