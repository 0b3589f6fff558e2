use rolegate_application::{EmailTemplateRecord, SaveEmailTemplateInput};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of an email template.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/email-template-response.ts"
)]
pub struct EmailTemplateResponse {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub description: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<EmailTemplateRecord> for EmailTemplateResponse {
    fn from(value: EmailTemplateRecord) -> Self {
        let template = value.template;
        Self {
            id: template.id().to_string(),
            name: template.name().to_owned(),
            subject: template.subject().to_owned(),
            body_text: template.body_text().to_owned(),
            body_html: template.body_html().map(str::to_owned),
            description: template.description().to_owned(),
            is_active: template.is_active(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for creating or replacing a template.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-email-template-request.ts"
)]
pub struct SaveEmailTemplateRequest {
    pub name: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl From<SaveEmailTemplateRequest> for SaveEmailTemplateInput {
    fn from(value: SaveEmailTemplateRequest) -> Self {
        Self {
            name: value.name,
            subject: value.subject,
            body_text: value.body_text,
            body_html: value.body_html,
            description: value.description,
            is_active: value.is_active,
        }
    }
}
