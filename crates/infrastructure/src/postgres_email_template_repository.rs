use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use rolegate_application::{EmailTemplateRecord, EmailTemplateRepository};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{EmailTemplate, EmailTemplateId};

use crate::conflict_or_internal;

/// PostgreSQL-backed repository for email templates.
#[derive(Clone)]
pub struct PostgresEmailTemplateRepository {
    pool: PgPool,
}

impl PostgresEmailTemplateRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EmailTemplateRow {
    id: uuid::Uuid,
    name: String,
    subject: String,
    body_text: String,
    body_html: Option<String>,
    description: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EmailTemplateRow> for EmailTemplateRecord {
    type Error = AppError;

    fn try_from(row: EmailTemplateRow) -> Result<Self, Self::Error> {
        let template = EmailTemplate::new(
            EmailTemplateId::from_uuid(row.id),
            row.name.as_str(),
            row.subject,
            row.body_text,
            row.body_html,
            row.description,
            row.is_active,
        )
        .map_err(|error| {
            AppError::Internal(format!(
                "stored email template '{}' is invalid: {error}",
                row.name
            ))
        })?;

        Ok(Self {
            template,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn template_not_found(template_id: EmailTemplateId) -> AppError {
    AppError::NotFound(format!("email template '{template_id}' does not exist"))
}

fn name_conflict_or_internal(error: sqlx::Error, operation: &str, name: &str) -> AppError {
    conflict_or_internal(error, operation, || {
        format!("email template '{name}' already exists")
    })
}

#[async_trait]
impl EmailTemplateRepository for PostgresEmailTemplateRepository {
    async fn list_templates(&self) -> AppResult<Vec<EmailTemplateRecord>> {
        let rows = sqlx::query_as::<_, EmailTemplateRow>(
            r#"
            SELECT id, name, subject, body_text, body_html, description, is_active,
                   created_at, updated_at
            FROM email_templates
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list email templates: {error}")))?;

        rows.into_iter().map(EmailTemplateRecord::try_from).collect()
    }

    async fn find_template(
        &self,
        template_id: EmailTemplateId,
    ) -> AppResult<Option<EmailTemplateRecord>> {
        let row = sqlx::query_as::<_, EmailTemplateRow>(
            r#"
            SELECT id, name, subject, body_text, body_html, description, is_active,
                   created_at, updated_at
            FROM email_templates
            WHERE id = $1
            "#,
        )
        .bind(template_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find email template: {error}")))?;

        row.map(EmailTemplateRecord::try_from).transpose()
    }

    async fn find_template_by_name(&self, name: &str) -> AppResult<Option<EmailTemplateRecord>> {
        let row = sqlx::query_as::<_, EmailTemplateRow>(
            r#"
            SELECT id, name, subject, body_text, body_html, description, is_active,
                   created_at, updated_at
            FROM email_templates
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find email template by name: {error}"))
        })?;

        row.map(EmailTemplateRecord::try_from).transpose()
    }

    async fn create_template(&self, template: &EmailTemplate) -> AppResult<EmailTemplateRecord> {
        let row = sqlx::query_as::<_, EmailTemplateRow>(
            r#"
            INSERT INTO email_templates
                (id, name, subject, body_text, body_html, description, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, subject, body_text, body_html, description, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(template.id().as_uuid())
        .bind(template.name())
        .bind(template.subject())
        .bind(template.body_text())
        .bind(template.body_html())
        .bind(template.description())
        .bind(template.is_active())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            name_conflict_or_internal(error, "create email template", template.name())
        })?;

        row.try_into()
    }

    async fn update_template(&self, template: &EmailTemplate) -> AppResult<EmailTemplateRecord> {
        let row = sqlx::query_as::<_, EmailTemplateRow>(
            r#"
            UPDATE email_templates
            SET name = $2,
                subject = $3,
                body_text = $4,
                body_html = $5,
                description = $6,
                is_active = $7,
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, subject, body_text, body_html, description, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(template.id().as_uuid())
        .bind(template.name())
        .bind(template.subject())
        .bind(template.body_text())
        .bind(template.body_html())
        .bind(template.description())
        .bind(template.is_active())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            name_conflict_or_internal(error, "update email template", template.name())
        })?;

        row.ok_or_else(|| template_not_found(template.id()))?
            .try_into()
    }

    async fn delete_template(&self, template_id: EmailTemplateId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM email_templates WHERE id = $1")
            .bind(template_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete email template: {error}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(template_not_found(template_id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rolegate_application::EmailTemplateRepository;
    use rolegate_core::AppError;
    use rolegate_domain::{EmailTemplate, EmailTemplateId, PASSWORD_RESET_TEMPLATE};

    use super::PostgresEmailTemplateRepository;
    use crate::test_database::{test_pool, unique_name};

    fn template(id: EmailTemplateId, name: &str, subject: &str) -> EmailTemplate {
        EmailTemplate::new(
            id,
            name,
            subject,
            "Hello {{name}}",
            Some("<p>Hello {{name}}</p>".to_owned()),
            "",
            true,
        )
        .unwrap_or_else(|error| panic!("template should be valid: {error}"))
    }

    #[tokio::test]
    async fn seeded_password_reset_template_is_available() {
        let Some(pool) = test_pool().await else {
            return;
        };

        let repository = PostgresEmailTemplateRepository::new(pool);
        let record = repository
            .find_template_by_name(PASSWORD_RESET_TEMPLATE)
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| panic!("password reset template should be seeded"));

        assert!(record.template.body_text().contains("{{reset_url}}"));
    }

    #[tokio::test]
    async fn create_update_and_delete_round_through_the_table() {
        let Some(pool) = test_pool().await else {
            return;
        };

        let repository = PostgresEmailTemplateRepository::new(pool);
        let id = EmailTemplateId::new();
        let name = unique_name("welcome");

        let created = repository
            .create_template(&template(id, name.as_str(), "Welcome"))
            .await
            .unwrap_or_else(|error| panic!("template should be created: {error}"));
        assert_eq!(created.template.id(), id);

        let duplicate = repository
            .create_template(&template(EmailTemplateId::new(), name.as_str(), "Again"))
            .await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));

        let updated = repository
            .update_template(&template(id, name.as_str(), "Welcome aboard"))
            .await
            .unwrap_or_else(|error| panic!("template should be updated: {error}"));
        assert_eq!(updated.template.subject(), "Welcome aboard");
        assert!(updated.updated_at >= created.updated_at);

        assert!(repository.delete_template(id).await.is_ok());
        assert!(matches!(
            repository.delete_template(id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
