use super::*;

impl SecurityAdminService {
    /// Lists every grant a user holds, including expired ones.
    pub async fn list_user_grants(
        &self,
        actor: &AuthenticatedUser,
        user_id: UserId,
    ) -> AppResult<Vec<RoleGrant>> {
        require_roles_permission(actor, false)?;

        self.require_user_exists(user_id).await?;
        self.repository.list_user_grants(user_id).await
    }

    /// Grants a role to a user, recording the actor as grantor.
    pub async fn grant_role(
        &self,
        actor: &AuthenticatedUser,
        user_id: UserId,
        input: GrantRoleInput,
    ) -> AppResult<RoleGrant> {
        require_roles_permission(actor, true)?;

        if let Some(expires_at) = input.expires_at
            && expires_at <= Utc::now()
        {
            return Err(AppError::Validation(
                "role grant expiry must be in the future".to_owned(),
            ));
        }

        self.require_user_exists(user_id).await?;
        let role = self.require_role_record(input.role_id).await?;

        let grant = self
            .repository
            .grant_role(user_id, role.id, Some(actor.user_id()), input.expires_at)
            .await?;

        let detail = match grant.expires_at {
            Some(expires_at) => format!("{} until {}", role.name, expires_at.to_rfc3339()),
            None => role.name,
        };
        self.append_audit(
            actor,
            AuditAction::RoleAssigned,
            "user",
            user_id.to_string(),
            Some(detail),
        )
        .await?;

        Ok(grant)
    }

    /// Revokes a role from a user.
    pub async fn revoke_role(
        &self,
        actor: &AuthenticatedUser,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        require_roles_permission(actor, true)?;

        let role = self.require_role_record(role_id).await?;
        if !self.repository.revoke_role(user_id, role_id).await? {
            return Err(AppError::NotFound(format!(
                "user '{user_id}' does not hold role '{}'",
                role.name
            )));
        }

        self.append_audit(
            actor,
            AuditAction::RoleUnassigned,
            "user",
            user_id.to_string(),
            Some(role.name),
        )
        .await
    }

    async fn require_user_exists(&self, user_id: UserId) -> AppResult<()> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }
}
