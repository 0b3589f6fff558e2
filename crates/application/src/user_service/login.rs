use super::*;

impl UserService {
    /// Authenticates a user with email and password.
    ///
    /// Returns `AuthOutcome::Failed` for an unknown email, a wrong password,
    /// an inactive account and a locked account alike.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let Ok(email_address) = EmailAddress::new(email) else {
            self.equalize_timing(password);
            return Ok(AuthOutcome::Failed);
        };

        let user = self
            .user_repository
            .find_by_email(email_address.as_str())
            .await?;

        let Some(user) = user else {
            self.equalize_timing(password);
            return Ok(AuthOutcome::Failed);
        };

        let now = Utc::now();
        let locked = user.locked_until.is_some_and(|locked_until| now < locked_until);
        if locked || !user.is_active {
            self.equalize_timing(password);
            tracing::info!(user_id = %user.id, locked, "login refused for unavailable account");
            return Ok(AuthOutcome::Failed);
        }

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            self.user_repository
                .record_failed_login(
                    user.id,
                    MAX_FAILED_LOGINS,
                    now + chrono::Duration::minutes(LOCKOUT_MINUTES),
                )
                .await?;

            return Ok(AuthOutcome::Failed);
        }

        self.user_repository.record_successful_login(user.id).await?;

        Ok(AuthOutcome::Authenticated(user))
    }
}
