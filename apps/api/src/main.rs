//! Rolegate API composition root and operator CLI.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod migrations;
mod state;

use clap::{Parser, Subcommand};
use rolegate_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, DatabaseConfig, init_tracing};

/// Role-based access control service.
#[derive(Debug, Parser)]
#[command(name = "rolegate-api", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations and serve the HTTP API.
    Serve,
    /// Manage database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Print the package name and version.
    Version,
}

#[derive(Debug, Subcommand)]
enum MigrateCommand {
    /// Apply every pending migration.
    Up,
    /// Revert the most recently applied migrations.
    Down {
        /// Number of migrations to revert.
        #[arg(long, default_value_t = 1)]
        steps: usize,
    },
    /// List known migrations and whether each is applied.
    Status,
    /// Write an empty reversible migration pair.
    Create {
        /// Short snake_case description, used in the file names.
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            init_tracing();
            serve().await
        }
        Command::Migrate(command) => {
            init_tracing();
            migrate(command).await
        }
        Command::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn serve() -> Result<(), AppError> {
    let config = ApiConfig::load()?;
    let pool = api_services::connect_and_migrate(&config.database).await?;

    let app_state = api_services::build_app_state(&config, pool)?;
    api_services::bootstrap_admin(&config, &app_state).await?;

    let app = api_router::build_router(app_state, &config)?;
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "rolegate-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

async fn migrate(command: MigrateCommand) -> Result<(), AppError> {
    match command {
        MigrateCommand::Create { name } => {
            let directory = DatabaseConfig::migrations_dir();
            let (up, down) = migrations::create(directory.as_path(), &name, chrono::Utc::now())?;
            println!("created {}", up.display());
            println!("created {}", down.display());
            Ok(())
        }
        MigrateCommand::Up => migrations::up(&migration_pool().await?).await,
        MigrateCommand::Down { steps } => migrations::down(&migration_pool().await?, steps).await,
        MigrateCommand::Status => {
            for line in migrations::status(&migration_pool().await?).await? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

async fn migration_pool() -> Result<sqlx::PgPool, AppError> {
    let database = DatabaseConfig::load()?;
    api_services::connect(&database).await
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        return;
    }

    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command, MigrateCommand};

    #[test]
    fn migrate_down_defaults_to_one_step() {
        let cli = Cli::try_parse_from(["rolegate-api", "migrate", "down"])
            .unwrap_or_else(|error| panic!("arguments should parse: {error}"));

        assert!(matches!(
            cli.command,
            Some(Command::Migrate(MigrateCommand::Down { steps: 1 }))
        ));
    }

    #[test]
    fn migrate_create_takes_a_name() {
        let cli = Cli::try_parse_from(["rolegate-api", "migrate", "create", "add_teams"])
            .unwrap_or_else(|error| panic!("arguments should parse: {error}"));

        assert!(matches!(
            cli.command,
            Some(Command::Migrate(MigrateCommand::Create { ref name })) if name == "add_teams"
        ));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["rolegate-api", "explode"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
