use rolegate_core::AppError;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppState;

/// Creates the configured administrator account on first start.
pub async fn bootstrap_admin(config: &ApiConfig, state: &AppState) -> Result<(), AppError> {
    let Some(bootstrap) = &config.bootstrap_admin else {
        return Ok(());
    };
    let Some(admin_role) = config.admin_roles.first() else {
        return Ok(());
    };

    match state
        .user_service
        .ensure_bootstrap_admin(&bootstrap.email, &bootstrap.password, admin_role)
        .await?
    {
        Some(user) => info!(user_id = %user.id, role = %admin_role, "bootstrap admin created"),
        None => info!("bootstrap admin already exists"),
    }

    Ok(())
}
