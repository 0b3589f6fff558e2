use super::*;

impl PostgresUserRepository {
    pub(super) async fn create_impl(&self, user: NewUser) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users
                (email, password_hash, first_name, last_name, is_active, password_changed_at)
            VALUES (LOWER($1), $2, $3, $4, $5, now())
            RETURNING id, email, password_hash, first_name, last_name, is_active,
                      failed_login_count, locked_until, last_login_at, created_at, updated_at
            "#,
        )
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "create user"))?;

        Ok(row.into())
    }

    pub(super) async fn update_profile_impl(
        &self,
        user_id: UserId,
        profile: &UserProfileUpdate,
    ) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, email, password_hash, first_name, last_name, is_active,
                      failed_login_count, locked_until, last_login_at, created_at, updated_at
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(profile.first_name.as_str())
        .bind(profile.last_name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update profile: {error}")))?;

        row.map(UserRecord::from)
            .ok_or_else(|| user_not_found(user_id))
    }

    pub(super) async fn update_account_impl(
        &self,
        user_id: UserId,
        update: &UserAccountUpdate,
    ) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET email = LOWER($2),
                first_name = $3,
                last_name = $4,
                is_active = $5,
                password_hash = COALESCE($6, password_hash),
                password_changed_at = CASE WHEN $6 IS NULL THEN password_changed_at ELSE now() END,
                failed_login_count = CASE WHEN $6 IS NULL THEN failed_login_count ELSE 0 END,
                locked_until = CASE WHEN $6 IS NULL THEN locked_until ELSE NULL END,
                updated_at = now()
            WHERE id = $1
            RETURNING id, email, password_hash, first_name, last_name, is_active,
                      failed_login_count, locked_until, last_login_at, created_at, updated_at
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(update.email.as_str())
        .bind(update.first_name.as_str())
        .bind(update.last_name.as_str())
        .bind(update.is_active)
        .bind(update.password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "update user"))?;

        row.map(UserRecord::from)
            .ok_or_else(|| user_not_found(user_id))
    }

    pub(super) async fn update_password_impl(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2,
                password_changed_at = now(),
                failed_login_count = 0,
                locked_until = NULL,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update password: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user_id));
        }

        Ok(())
    }

    pub(super) async fn delete_impl(&self, user_id: UserId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user_id));
        }

        Ok(())
    }
}
