use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rolegate_core::AppResult;
use rolegate_domain::{EmailTemplate, EmailTemplateId};

/// Port for sending emails. Infrastructure provides SMTP or console implementations.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends a plain-text email with an optional HTML alternative.
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()>;
}

/// Stored template with bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplateRecord {
    /// Template content.
    pub template: EmailTemplate,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Repository port for email templates.
#[async_trait]
pub trait EmailTemplateRepository: Send + Sync {
    /// Lists templates ordered by name.
    async fn list_templates(&self) -> AppResult<Vec<EmailTemplateRecord>>;

    /// Finds a template by id.
    async fn find_template(&self, template_id: EmailTemplateId)
    -> AppResult<Option<EmailTemplateRecord>>;

    /// Finds a template by its unique name.
    async fn find_template_by_name(&self, name: &str) -> AppResult<Option<EmailTemplateRecord>>;

    /// Inserts a template. Fails with `Conflict` when the name is taken.
    async fn create_template(&self, template: &EmailTemplate) -> AppResult<EmailTemplateRecord>;

    /// Replaces a template's content.
    async fn update_template(&self, template: &EmailTemplate) -> AppResult<EmailTemplateRecord>;

    /// Deletes a template.
    async fn delete_template(&self, template_id: EmailTemplateId) -> AppResult<()>;
}
