//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use rolegate_application::{
    NewUser, UserAccountUpdate, UserListQuery, UserProfileUpdate, UserRecord, UserRepository,
};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::UserId;

use crate::conflict_or_internal;

mod account;
mod login;
mod lookup;


/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: uuid::Uuid,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    is_active: bool,
    failed_login_count: i32,
    locked_until: Option<DateTime<Utc>>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            is_active: row.is_active,
            failed_login_count: row.failed_login_count,
            locked_until: row.locked_until,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn email_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    conflict_or_internal(error, operation, || {
        "an account with this email already exists".to_owned()
    })
}

fn user_not_found(user_id: UserId) -> AppError {
    AppError::NotFound(format!("user '{user_id}' does not exist"))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        self.find_by_email_impl(email).await
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn list(&self, query: UserListQuery) -> AppResult<Vec<UserRecord>> {
        self.list_impl(query).await
    }

    async fn count(&self) -> AppResult<i64> {
        self.count_impl().await
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        self.create_impl(user).await
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        profile: &UserProfileUpdate,
    ) -> AppResult<UserRecord> {
        self.update_profile_impl(user_id, profile).await
    }

    async fn update_account(
        &self,
        user_id: UserId,
        update: &UserAccountUpdate,
    ) -> AppResult<UserRecord> {
        self.update_account_impl(user_id, update).await
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        self.update_password_impl(user_id, password_hash).await
    }

    async fn record_failed_login(
        &self,
        user_id: UserId,
        lock_threshold: i32,
        locked_until: DateTime<Utc>,
    ) -> AppResult<()> {
        self.record_failed_login_impl(user_id, lock_threshold, locked_until)
            .await
    }

    async fn record_successful_login(&self, user_id: UserId) -> AppResult<()> {
        self.record_successful_login_impl(user_id).await
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        self.delete_impl(user_id).await
    }
}
