use super::*;

impl AuthorizationService {
    pub(super) async fn try_resolve_access_at(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<AccessContext> {
        let grants = self.list_active_grants(user_id, now).await?;
        if grants.is_empty() {
            return Ok(AccessContext::empty());
        }

        let role_ids: Vec<RoleId> = grants.iter().map(|grant| grant.role_id).collect();
        let permissions = self
            .repository
            .list_permission_names_for_roles(&role_ids)
            .await?;

        Ok(AccessContext::new(
            grants.into_iter().map(|grant| grant.role_name),
            permissions,
        ))
    }
}

pub(super) fn active_grants(grants: Vec<RoleGrant>, now: DateTime<Utc>) -> Vec<RoleGrant> {
    grants
        .into_iter()
        .filter(|grant| grant.is_active_at(now))
        .collect()
}
