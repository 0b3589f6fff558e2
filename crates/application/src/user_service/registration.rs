use rolegate_domain::validate_password;

use super::*;

/// Longest accepted first or last name.
const NAME_MAX_LENGTH: usize = 100;

impl UserService {
    /// Registers a new account with email and password.
    ///
    /// The configured default role is granted when it exists. A missing
    /// default role or a failed grant is logged and does not block
    /// registration; the account exists either way.
    pub async fn register(&self, params: RegisterParams) -> AppResult<UserRecord> {
        let email_address = EmailAddress::new(&params.email)?;
        validate_password(&params.password)?;
        let first_name = normalize_name(&params.first_name, "first name")?;
        let last_name = normalize_name(&params.last_name, "last name")?;

        let existing = self
            .user_repository
            .find_by_email(email_address.as_str())
            .await?;

        if existing.is_some() {
            self.equalize_timing(&params.password);
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let user = self
            .user_repository
            .create(NewUser {
                email: email_address.into(),
                password_hash,
                first_name,
                last_name,
                is_active: true,
            })
            .await?;

        if let Err(error) = self.grant_default_role(user.id).await {
            tracing::warn!(
                user_id = %user.id,
                error = %error,
                "default role grant failed, account registered without it"
            );
        }

        Ok(user)
    }

    async fn grant_default_role(&self, user_id: UserId) -> AppResult<()> {
        let Some(role_name) = self.default_role.as_deref() else {
            return Ok(());
        };

        let Some(role) = self.security_repository.find_role_by_name(role_name).await? else {
            tracing::warn!(role = role_name, "default role is missing, skipping grant");
            return Ok(());
        };

        self.security_repository
            .grant_role(user_id, role.id, None, None)
            .await?;

        Ok(())
    }
}

/// Trims a profile name and bounds its length. Empty names are allowed.
pub(super) fn normalize_name(value: &str, label: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() > NAME_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "{label} must not exceed {NAME_MAX_LENGTH} characters"
        )));
    }

    Ok(trimmed.to_owned())
}
