use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;
use rolegate_core::AppError;
use rolegate_infrastructure::MIN_SECRET_LENGTH;
use tracing_subscriber::EnvFilter;

const DEFAULT_MIGRATIONS_DIR: &str = "crates/infrastructure/migrations";
/// Longest accepted token or reset link lifetime: one year.
const MAX_TTL_MINUTES: i64 = 525_600;

#[derive(Debug, Clone)]
pub struct SmtpRuntimeConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub enum EmailProviderConfig {
    Console,
    Smtp(SmtpRuntimeConfig),
}

#[derive(Debug, Clone)]
pub struct BootstrapAdminConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn migrations_dir() -> PathBuf {
        env::var("MIGRATIONS_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_MIGRATIONS_DIR), PathBuf::from)
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            url: required_non_empty(lookup, "DATABASE_URL")?,
            max_connections: parsed_or(lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database: DatabaseConfig,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_ttl: Duration,
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub password_reset_ttl: Duration,
    pub admin_roles: Vec<String>,
    pub default_user_role: Option<String>,
    pub email_provider: EmailProviderConfig,
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database = DatabaseConfig::from_lookup(lookup)?;

        let jwt_secret = required_non_empty(lookup, "JWT_SECRET")?;
        if jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "JWT_SECRET must be at least {MIN_SECRET_LENGTH} characters"
            )));
        }

        let jwt_ttl_minutes = ttl_minutes(lookup, "JWT_TTL_MINUTES")?;
        let password_reset_ttl_minutes = ttl_minutes(lookup, "PASSWORD_RESET_TTL_MINUTES")?;

        let admin_roles = optional(lookup, "ADMIN_ROLES")
            .unwrap_or_else(|| "admin".to_owned())
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_owned)
            .collect::<Vec<_>>();
        if admin_roles.is_empty() {
            return Err(AppError::Validation(
                "ADMIN_ROLES must name at least one role".to_owned(),
            ));
        }

        let default_user_role = match lookup("DEFAULT_USER_ROLE") {
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(value.trim().to_owned()),
            None => Some("user".to_owned()),
        };

        let email_provider = match optional(lookup, "EMAIL_PROVIDER")
            .unwrap_or_else(|| "console".to_owned())
            .as_str()
        {
            "console" => EmailProviderConfig::Console,
            "smtp" => EmailProviderConfig::Smtp(SmtpRuntimeConfig {
                host: required_non_empty(lookup, "SMTP_HOST")?,
                port: required_non_empty(lookup, "SMTP_PORT")?
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid SMTP_PORT: {error}")))?,
                username: required_non_empty(lookup, "SMTP_USERNAME")?,
                password: required_non_empty(lookup, "SMTP_PASSWORD")?,
                from_address: required_non_empty(lookup, "SMTP_FROM_ADDRESS")?,
            }),
            other => {
                return Err(AppError::Validation(format!(
                    "EMAIL_PROVIDER must be either 'console' or 'smtp', got '{other}'"
                )));
            }
        };

        let bootstrap_admin = match (
            optional(lookup, "BOOTSTRAP_ADMIN_EMAIL"),
            optional(lookup, "BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdminConfig { email, password }),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together"
                        .to_owned(),
                ));
            }
        };

        Ok(Self {
            database,
            jwt_secret,
            jwt_issuer: optional(lookup, "JWT_ISSUER").unwrap_or_else(|| "rolegate".to_owned()),
            jwt_ttl: Duration::minutes(jwt_ttl_minutes),
            api_host: optional(lookup, "API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned()),
            api_port: parsed_or(lookup, "API_PORT", 3001)?,
            frontend_url: optional(lookup, "FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_owned()),
            password_reset_ttl: Duration::minutes(password_reset_ttl_minutes),
            admin_roles,
            default_user_role,
            email_provider,
            bootstrap_admin,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn env_lookup(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn optional(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required_non_empty(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parsed_or<T>(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(lookup, name) {
        Some(value) => value
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}

fn ttl_minutes(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> Result<i64, AppError> {
    let minutes: i64 = parsed_or(lookup, name, 60)?;
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        return Err(AppError::Validation(format!(
            "{name} must be between 1 and {MAX_TTL_MINUTES} minutes"
        )));
    }

    Ok(minutes)
}
