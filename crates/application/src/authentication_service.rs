//! Bearer token issuing and request authentication.

use std::sync::Arc;

use rolegate_core::{AppError, AppResult};

use crate::{
    AccessTokenService, AuthenticatedUser, AuthorizationService, IssuedAccessToken, UserRecord,
    UserRepository,
};

/// Turns bearer credentials into authenticated callers.
#[derive(Clone)]
pub struct AuthenticationService {
    token_service: Arc<dyn AccessTokenService>,
    user_repository: Arc<dyn UserRepository>,
    authorization_service: AuthorizationService,
}

impl AuthenticationService {
    /// Creates a new authentication service.
    #[must_use]
    pub fn new(
        token_service: Arc<dyn AccessTokenService>,
        user_repository: Arc<dyn UserRepository>,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            token_service,
            user_repository,
            authorization_service,
        }
    }

    /// Issues an access token for a user who just logged in.
    pub fn issue_token(&self, user: &UserRecord) -> AppResult<IssuedAccessToken> {
        self.token_service.issue(user.id, &user.email)
    }

    /// Verifies the bearer token, loads the account and resolves its access.
    ///
    /// Deleted and deactivated accounts are rejected even while their token
    /// is still within its lifetime.
    pub async fn authenticate(&self, bearer_token: &str) -> AppResult<AuthenticatedUser> {
        let claims = self.token_service.verify(bearer_token).map_err(|rejection| {
            tracing::warn!(reason = %rejection, "bearer token rejected");
            AppError::from(rejection)
        })?;

        let user = self
            .user_repository
            .find_by_id(claims.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::Unauthorized("account is not available".to_owned()))?;

        let access = self.authorization_service.resolve_access(user.id).await;

        Ok(AuthenticatedUser::new(user.id, user.identity(), access))
    }
}
