use super::token_crypto::hash_token;
use super::*;

impl PasswordResetService {
    /// Sets a new password using a reset token.
    ///
    /// The password is validated first, so a rejected password leaves the
    /// token usable.
    pub async fn reset_password(&self, raw_token: &str, new_password: &str) -> AppResult<()> {
        let raw_token = raw_token.trim();
        if raw_token.is_empty() {
            return Err(AppError::Validation("reset token is required".to_owned()));
        }

        validate_password(new_password)?;

        let token = self
            .token_repository
            .consume_valid_token(&hash_token(raw_token))
            .await?
            .ok_or_else(|| {
                AppError::Validation("reset token is invalid or has expired".to_owned())
            })?;

        let new_hash = self.password_hasher.hash_password(new_password)?;
        self.user_repository
            .update_password(token.user_id, &new_hash)
            .await?;

        self.token_repository
            .invalidate_tokens_for_user(token.user_id)
            .await
    }
}
