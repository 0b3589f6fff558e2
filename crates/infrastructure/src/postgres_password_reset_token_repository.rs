//! PostgreSQL-backed password reset token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use rolegate_application::{PasswordResetTokenRecord, PasswordResetTokenRepository};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::UserId;

/// PostgreSQL implementation of the reset token repository port.
#[derive(Clone)]
pub struct PostgresPasswordResetTokenRepository {
    pool: PgPool,
}

impl PostgresPasswordResetTokenRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TokenRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    email: String,
    expires_at: DateTime<Utc>,
}

impl From<TokenRow> for PasswordResetTokenRecord {
    fn from(row: TokenRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            email: row.email,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl PasswordResetTokenRepository for PostgresPasswordResetTokenRepository {
    async fn create_token(
        &self,
        user_id: UserId,
        email: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<uuid::Uuid> {
        sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO password_reset_tokens (user_id, email, token_hash, expires_at)
            VALUES ($1, LOWER($2), $3, $4)
            RETURNING id
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(email)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create reset token: {error}")))
    }

    async fn consume_valid_token(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<PasswordResetTokenRecord>> {
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            UPDATE password_reset_tokens
            SET used_at = now()
            WHERE token_hash = $1
              AND used_at IS NULL
              AND expires_at > now()
            RETURNING id, user_id, email, expires_at
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to consume reset token: {error}")))?;

        Ok(row.map(PasswordResetTokenRecord::from))
    }

    async fn invalidate_tokens_for_user(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE password_reset_tokens
            SET used_at = now()
            WHERE user_id = $1
              AND used_at IS NULL
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to invalidate reset tokens: {error}"))
        })?;

        Ok(())
    }

    async fn count_recent_tokens(&self, email: &str, since: DateTime<Utc>) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM password_reset_tokens
            WHERE email = LOWER($1)
              AND created_at >= $2
            "#,
        )
        .bind(email)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count reset tokens: {error}")))
    }
}
