//! Console email service for development. Logs emails to tracing output.

use async_trait::async_trait;
use rolegate_application::EmailService;
use rolegate_core::AppResult;
use tracing::info;

/// Development email service that logs emails instead of sending them.
#[derive(Clone, Default)]
pub struct ConsoleEmailService;

impl ConsoleEmailService {
    /// Creates a new console email service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailService for ConsoleEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()> {
        info!(
            to,
            subject,
            has_html = html_body.is_some(),
            "email (console)\n{text_body}"
        );

        Ok(())
    }
}
