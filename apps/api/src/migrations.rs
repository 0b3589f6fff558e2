//! Operator migration commands backed by the embedded migrator.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rolegate_core::AppError;
use rolegate_infrastructure::MIGRATOR;
use sqlx::PgPool;
use sqlx::migrate::Migrate;
use tracing::info;

/// Applies every pending migration.
pub async fn up(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    info!("migrations applied");
    Ok(())
}

/// Reverts the `steps` most recently applied migrations.
pub async fn down(pool: &PgPool, steps: usize) -> Result<(), AppError> {
    if steps == 0 {
        return Err(AppError::Validation("--steps must be at least 1".to_owned()));
    }

    let applied = applied_versions(pool).await?;
    if applied.is_empty() {
        info!("no applied migrations to revert");
        return Ok(());
    }

    let target = revert_target(&applied, steps);
    MIGRATOR
        .undo(pool, target)
        .await
        .map_err(|error| AppError::Internal(format!("failed to revert migrations: {error}")))?;

    info!(steps = steps.min(applied.len()), target, "migrations reverted");
    Ok(())
}

/// Returns one line per known migration with its applied state.
pub async fn status(pool: &PgPool) -> Result<Vec<String>, AppError> {
    let applied = applied_versions(pool).await?;

    Ok(MIGRATOR
        .iter()
        .filter(|migration| !migration.migration_type.is_down_migration())
        .map(|migration| {
            let state = if applied.contains(&migration.version) {
                "applied"
            } else {
                "pending"
            };
            format!("{:<8} {} {}", state, migration.version, migration.description)
        })
        .collect())
}

/// Writes an empty reversible migration pair named after `name`.
pub fn create(
    directory: &Path,
    name: &str,
    now: DateTime<Utc>,
) -> Result<(PathBuf, PathBuf), AppError> {
    validate_migration_name(name)?;

    fs::create_dir_all(directory).map_err(|error| {
        AppError::Internal(format!(
            "failed to create migrations directory '{}': {error}",
            directory.display()
        ))
    })?;

    let stem = format!("{}_{name}", now.format("%Y%m%d%H%M%S"));
    let up_path = directory.join(format!("{stem}.up.sql"));
    let down_path = directory.join(format!("{stem}.down.sql"));

    write_new_file(&up_path, &format!("-- {name}: forward migration\n"))?;
    write_new_file(&down_path, &format!("-- {name}: revert the forward migration\n"))?;

    Ok((up_path, down_path))
}

async fn applied_versions(pool: &PgPool) -> Result<Vec<i64>, AppError> {
    let mut connection = pool
        .acquire()
        .await
        .map_err(|error| AppError::Internal(format!("failed to acquire connection: {error}")))?;

    connection.ensure_migrations_table().await.map_err(|error| {
        AppError::Internal(format!("failed to prepare migrations table: {error}"))
    })?;

    let mut versions = connection
        .list_applied_migrations()
        .await
        .map_err(|error| AppError::Internal(format!("failed to list applied migrations: {error}")))?
        .into_iter()
        .map(|migration| migration.version)
        .collect::<Vec<_>>();
    versions.sort_unstable_by(|left, right| right.cmp(left));

    Ok(versions)
}

/// Every migration newer than the returned version is reverted.
fn revert_target(applied_newest_first: &[i64], steps: usize) -> i64 {
    applied_newest_first.get(steps).copied().unwrap_or(0)
}

fn validate_migration_name(name: &str) -> Result<(), AppError> {
    let valid = !name.is_empty()
        && name.chars().all(|character| {
            character.is_ascii_lowercase() || character.is_ascii_digit() || character == '_'
        });
    if !valid {
        return Err(AppError::Validation(format!(
            "migration name '{name}' must be non-empty snake_case using a-z, 0-9 and '_'"
        )));
    }

    Ok(())
}

fn write_new_file(path: &Path, contents: &str) -> Result<(), AppError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|error| match error.kind() {
            std::io::ErrorKind::AlreadyExists => {
                AppError::Conflict(format!("migration file '{}' already exists", path.display()))
            }
            _ => AppError::Internal(format!("failed to create '{}': {error}", path.display())),
        })?;

    file.write_all(contents.as_bytes()).map_err(|error| {
        AppError::Internal(format!("failed to write '{}': {error}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn scratch_directory() -> PathBuf {
        std::env::temp_dir().join(format!("rolegate-migrations-{}", Uuid::new_v4().simple()))
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 45)
            .single()
            .unwrap_or_else(|| panic!("fixed timestamp should be valid"))
    }

    #[test]
    fn create_writes_timestamped_pair() {
        let directory = scratch_directory();

        let (up_path, down_path) = create(&directory, "add_teams", fixed_now())
            .unwrap_or_else(|error| panic!("create should succeed: {error}"));

        assert_eq!(
            up_path.file_name().and_then(|name| name.to_str()),
            Some("20260301123045_add_teams.up.sql")
        );
        assert_eq!(
            down_path.file_name().and_then(|name| name.to_str()),
            Some("20260301123045_add_teams.down.sql")
        );
        assert!(up_path.exists());
        assert!(down_path.exists());

        let _ = fs::remove_dir_all(directory);
    }

    #[test]
    fn create_refuses_to_overwrite() {
        let directory = scratch_directory();
        create(&directory, "add_teams", fixed_now())
            .unwrap_or_else(|error| panic!("first create should succeed: {error}"));

        let result = create(&directory, "add_teams", fixed_now());

        assert!(matches!(result, Err(AppError::Conflict(_))));
        let _ = fs::remove_dir_all(directory);
    }

    #[test]
    fn create_rejects_unsafe_names() {
        let directory = scratch_directory();

        for name in ["", "Add-Teams", "../escape", "with space"] {
            assert!(matches!(
                create(&directory, name, fixed_now()),
                Err(AppError::Validation(_))
            ));
        }
        assert!(!directory.exists());
    }

    #[test]
    fn revert_target_counts_back_from_newest() {
        let applied = [30, 20, 10];

        assert_eq!(revert_target(&applied, 1), 20);
        assert_eq!(revert_target(&applied, 2), 10);
        assert_eq!(revert_target(&applied, 3), 0);
        assert_eq!(revert_target(&applied, 9), 0);
    }
}
