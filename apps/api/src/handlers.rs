pub mod audit;
pub mod auth;
pub mod email_templates;
pub mod health;
pub mod permissions;
pub mod profile;
pub mod roles;
pub mod users;

use std::str::FromStr;

use rolegate_core::AppError;

/// Parses a path segment into a typed identifier.
fn parse_id<T>(value: &str) -> Result<T, AppError>
where
    T: FromStr<Err = AppError>,
{
    value.parse::<T>()
}
