use rolegate_core::AppError;
use rolegate_infrastructure::MIGRATOR;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::api_config::DatabaseConfig;

pub async fn connect(database: &DatabaseConfig) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .max_connections(database.max_connections)
        .connect(&database.url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

pub async fn connect_and_migrate(database: &DatabaseConfig) -> Result<PgPool, AppError> {
    let pool = connect(database).await?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}
