use rolegate_domain::validate_password;

use super::*;

impl UserService {
    /// Creates the first administrator account if `email` is unknown.
    ///
    /// Returns the created account, or `None` when the email already exists.
    pub async fn ensure_bootstrap_admin(
        &self,
        email: &str,
        password: &str,
        admin_role: &str,
    ) -> AppResult<Option<UserRecord>> {
        let email_address = EmailAddress::new(email)?;
        if self
            .user_repository
            .find_by_email(email_address.as_str())
            .await?
            .is_some()
        {
            return Ok(None);
        }

        validate_password(password)?;
        let role = self
            .security_repository
            .find_role_by_name(admin_role)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!("bootstrap role '{admin_role}' does not exist"))
            })?;

        let password_hash = self.password_hasher.hash_password(password)?;
        let user = self
            .user_repository
            .create(NewUser {
                email: email_address.into(),
                password_hash,
                first_name: String::new(),
                last_name: String::new(),
                is_active: true,
            })
            .await?;

        self.security_repository
            .grant_role(user.id, role.id, None, None)
            .await?;

        Ok(Some(user))
    }
}
