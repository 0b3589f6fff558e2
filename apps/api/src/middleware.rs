use axum::Extension;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use rolegate_application::{AuthenticatedUser, AuthenticationService};
use rolegate_core::AppError;
use rolegate_domain::AccessRequirement;

use crate::error::ApiResult;

#[cfg(test)]
mod tests;

/// Verifies the bearer token and attaches the caller with resolved access.
pub async fn require_auth(
    State(authentication_service): State<AuthenticationService>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = extract_bearer(request.headers())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let user = authentication_service.authenticate(token).await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Rejects callers whose resolved access does not satisfy the route requirement.
pub async fn require_access(
    State(requirement): State<AccessRequirement>,
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if let Err(error) = user.require(&requirement) {
        tracing::warn!(
            user_id = %user.user_id(),
            requirement = %requirement.describe(),
            "route access denied"
        );
        return Err(error.into());
    }

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
