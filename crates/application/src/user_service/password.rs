use rolegate_domain::validate_password;

use super::*;

impl UserService {
    /// Changes the password for an authenticated user.
    ///
    /// The current password must be supplied and correct.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.require_user(user_id).await?;

        let current_valid = self
            .password_hasher
            .verify_password(current_password, &user.password_hash)?;

        if !current_valid {
            return Err(AppError::Unauthorized(
                "current password is incorrect".to_owned(),
            ));
        }

        validate_password(new_password)?;

        if current_password == new_password {
            return Err(AppError::Validation(
                "new password must differ from the current password".to_owned(),
            ));
        }

        let new_hash = self.password_hasher.hash_password(new_password)?;
        self.user_repository
            .update_password(user_id, &new_hash)
            .await
    }
}
