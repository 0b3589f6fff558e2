use rolegate_domain::render_placeholders;

use super::token_crypto::generate_token;
use super::*;

const FALLBACK_SUBJECT: &str = "Reset your password";
const FALLBACK_BODY: &str = "You requested a password reset.\n\n\
Open the link below to choose a new password:\n{{reset_url}}\n\n\
This link expires in {{expires_in_minutes}} minutes.\n\n\
If you did not request this, you can ignore this email.";

impl PasswordResetService {
    /// Issues a reset token and emails the reset link.
    ///
    /// Returns `Ok(())` for unknown, inactive and rate-limited addresses so
    /// callers cannot tell which accounts exist.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let Ok(canonical_email) = EmailAddress::new(email) else {
            return Ok(());
        };

        let one_hour_ago = Utc::now() - Duration::hours(1);
        let recent_count = self
            .token_repository
            .count_recent_tokens(canonical_email.as_str(), one_hour_ago)
            .await?;

        if recent_count >= PASSWORD_RESET_REQUESTS_PER_HOUR {
            tracing::info!("password reset rate limit reached");
            return Ok(());
        }

        let user = self
            .user_repository
            .find_by_email(canonical_email.as_str())
            .await?;
        let Some(user) = user.filter(|user| user.is_active) else {
            return Ok(());
        };

        let expires_at = Utc::now()
            .checked_add_signed(self.token_ttl)
            .ok_or_else(|| AppError::Internal("reset token expiry is out of range".to_owned()))?;
        self.token_repository
            .invalidate_tokens_for_user(user.id)
            .await?;

        let (raw_token, token_hash) = generate_token()?;
        self.token_repository
            .create_token(user.id, canonical_email.as_str(), &token_hash, expires_at)
            .await?;

        let reset_url = format!("{}/reset-password?token={raw_token}", self.frontend_url);
        let expires_in_minutes = self.token_ttl.num_minutes().to_string();
        let display_name = user.display_name();
        let variables = [
            ("reset_url", reset_url.as_str()),
            ("expires_in_minutes", expires_in_minutes.as_str()),
            ("name", display_name.as_str()),
            ("email", canonical_email.as_str()),
        ];

        let template = self
            .template_repository
            .find_template_by_name(PASSWORD_RESET_TEMPLATE)
            .await?
            .filter(|record| record.template.is_active());

        match template {
            Some(record) => {
                let rendered = record.template.render(&variables);
                self.email_service
                    .send_email(
                        canonical_email.as_str(),
                        &rendered.subject,
                        &rendered.text_body,
                        rendered.html_body.as_deref(),
                    )
                    .await
            }
            None => {
                let text_body = render_placeholders(FALLBACK_BODY, &variables);
                self.email_service
                    .send_email(canonical_email.as_str(), FALLBACK_SUBJECT, &text_body, None)
                    .await
            }
        }
    }
}
