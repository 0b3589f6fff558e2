//! Administration of stored email templates.

use std::sync::Arc;

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{
    AuditAction, EmailTemplate, EmailTemplateId, PASSWORD_RESET_TEMPLATE, SystemPermission,
};

use crate::{
    AuditEvent, AuditRepository, AuthenticatedUser, EmailTemplateRecord, EmailTemplateRepository,
};

#[cfg(test)]
mod tests;

/// Input payload for creating or replacing a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEmailTemplateInput {
    /// Unique template name.
    pub name: String,
    /// Subject line with optional placeholders.
    pub subject: String,
    /// Text body with optional placeholders.
    pub body_text: String,
    /// Optional HTML body with placeholders.
    pub body_html: Option<String>,
    /// Administrator-facing description.
    pub description: String,
    /// Whether the template is used when sending.
    pub is_active: bool,
}

/// Application service for email template CRUD.
#[derive(Clone)]
pub struct EmailTemplateService {
    repository: Arc<dyn EmailTemplateRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl EmailTemplateService {
    /// Creates a new email template service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn EmailTemplateRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            repository,
            audit_repository,
        }
    }

    /// Lists every template.
    pub async fn list_templates(
        &self,
        actor: &AuthenticatedUser,
    ) -> AppResult<Vec<EmailTemplateRecord>> {
        actor.require_permission(SystemPermission::EmailTemplatesRead.as_str())?;
        self.repository.list_templates().await
    }

    /// Returns one template.
    pub async fn get_template(
        &self,
        actor: &AuthenticatedUser,
        template_id: EmailTemplateId,
    ) -> AppResult<EmailTemplateRecord> {
        actor.require_permission(SystemPermission::EmailTemplatesRead.as_str())?;
        self.require_template(template_id).await
    }

    /// Creates a template.
    pub async fn create_template(
        &self,
        actor: &AuthenticatedUser,
        input: SaveEmailTemplateInput,
    ) -> AppResult<EmailTemplateRecord> {
        actor.require_permission(SystemPermission::EmailTemplatesWrite.as_str())?;

        let template = build_template(EmailTemplateId::new(), input)?;
        let record = self.repository.create_template(&template).await?;

        self.append_audit(actor, AuditAction::EmailTemplateCreated, &record)
            .await?;

        Ok(record)
    }

    /// Replaces a template's content.
    pub async fn update_template(
        &self,
        actor: &AuthenticatedUser,
        template_id: EmailTemplateId,
        input: SaveEmailTemplateInput,
    ) -> AppResult<EmailTemplateRecord> {
        actor.require_permission(SystemPermission::EmailTemplatesWrite.as_str())?;

        self.require_template(template_id).await?;
        let template = build_template(template_id, input)?;
        let record = self.repository.update_template(&template).await?;

        self.append_audit(actor, AuditAction::EmailTemplateUpdated, &record)
            .await?;

        Ok(record)
    }

    /// Deletes a template.
    ///
    /// Deleting the password reset template makes resets fall back to the
    /// built-in message.
    pub async fn delete_template(
        &self,
        actor: &AuthenticatedUser,
        template_id: EmailTemplateId,
    ) -> AppResult<()> {
        actor.require_permission(SystemPermission::EmailTemplatesWrite.as_str())?;

        let record = self.require_template(template_id).await?;
        self.repository.delete_template(template_id).await?;

        if record.template.name() == PASSWORD_RESET_TEMPLATE {
            tracing::info!("password reset template deleted, built-in text will be used");
        }

        self.append_audit(actor, AuditAction::EmailTemplateDeleted, &record)
            .await
    }

    async fn require_template(
        &self,
        template_id: EmailTemplateId,
    ) -> AppResult<EmailTemplateRecord> {
        self.repository
            .find_template(template_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("email template '{template_id}' does not exist"))
            })
    }

    async fn append_audit(
        &self,
        actor: &AuthenticatedUser,
        action: AuditAction,
        record: &EmailTemplateRecord,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.identity().subject().to_owned(),
                action,
                resource_type: "email_template".to_owned(),
                resource_id: record.template.id().to_string(),
                detail: Some(record.template.name().to_owned()),
            })
            .await
    }
}

fn build_template(
    template_id: EmailTemplateId,
    input: SaveEmailTemplateInput,
) -> AppResult<EmailTemplate> {
    EmailTemplate::new(
        template_id,
        input.name,
        input.subject,
        input.body_text,
        input.body_html,
        input.description,
        input.is_active,
    )
}
