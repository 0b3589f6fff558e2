use super::*;

impl PostgresUserRepository {
    pub(super) async fn record_failed_login_impl(
        &self,
        user_id: UserId,
        lock_threshold: i32,
        locked_until: DateTime<Utc>,
    ) -> AppResult<()> {
        // Past the threshold every further failure renews the lock until a
        // successful login or password change resets the counter.
        sqlx::query(
            r#"
            UPDATE users
            SET failed_login_count = failed_login_count + 1,
                locked_until = CASE
                    WHEN failed_login_count + 1 >= $2 THEN $3
                    ELSE locked_until
                END,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(lock_threshold)
        .bind(locked_until)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to record failed login: {error}")))?;

        Ok(())
    }

    pub(super) async fn record_successful_login_impl(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET failed_login_count = 0,
                locked_until = NULL,
                last_login_at = now(),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to record successful login: {error}"))
        })?;

        Ok(())
    }
}
