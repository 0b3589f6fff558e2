use super::*;

impl PostgresSecurityAdminRepository {
    pub(super) async fn grant_role_impl(
        &self,
        user_id: UserId,
        role_id: RoleId,
        granted_by: Option<UserId>,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<RoleGrant> {
        // Re-granting keeps the original granted_at.
        let row = sqlx::query_as::<_, RoleGrantRow>(
            r#"
            WITH upserted AS (
                INSERT INTO user_roles (user_id, role_id, granted_by, expires_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, role_id) DO UPDATE
                SET granted_by = EXCLUDED.granted_by,
                    expires_at = EXCLUDED.expires_at
                RETURNING role_id, granted_at, granted_by, expires_at
            )
            SELECT
                upserted.role_id,
                roles.name AS role_name,
                upserted.granted_at,
                upserted.granted_by,
                upserted.expires_at
            FROM upserted
            INNER JOIN roles ON roles.id = upserted.role_id
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .bind(granted_by.map(|grantor| grantor.as_uuid()))
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| missing_reference_or_internal(error, "grant role"))?;

        Ok(row.into())
    }

    pub(super) async fn revoke_role_impl(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_roles
            WHERE user_id = $1 AND role_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to revoke role: {error}")))?;

        Ok(result.rows_affected() > 0)
    }
}
