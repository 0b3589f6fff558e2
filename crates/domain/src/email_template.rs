//! Stored email templates with `{{placeholder}}` substitution.

use rolegate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::EmailTemplateId;

/// Name of the template used by the password reset flow.
pub const PASSWORD_RESET_TEMPLATE: &str = "password_reset";

/// Maximum accepted template name length.
pub const TEMPLATE_NAME_MAX_LENGTH: usize = 64;

/// An email template as stored and edited by administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    id: EmailTemplateId,
    name: String,
    subject: NonEmptyString,
    body_text: NonEmptyString,
    body_html: Option<String>,
    description: String,
    is_active: bool,
}

impl EmailTemplate {
    /// Creates a validated template.
    pub fn new(
        id: EmailTemplateId,
        name: impl Into<String>,
        subject: impl Into<String>,
        body_text: impl Into<String>,
        body_html: Option<String>,
        description: impl Into<String>,
        is_active: bool,
    ) -> AppResult<Self> {
        let name = validate_template_name(name.into())?;

        Ok(Self {
            id,
            name,
            subject: NonEmptyString::new(subject)?,
            body_text: NonEmptyString::new(body_text)?,
            body_html: body_html.filter(|html| !html.trim().is_empty()),
            description: description.into().trim().to_owned(),
            is_active,
        })
    }

    /// Returns the template id.
    #[must_use]
    pub fn id(&self) -> EmailTemplateId {
        self.id
    }

    /// Returns the unique template name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the raw subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the raw text body.
    #[must_use]
    pub fn body_text(&self) -> &str {
        self.body_text.as_str()
    }

    /// Returns the raw HTML body, if any.
    #[must_use]
    pub fn body_html(&self) -> Option<&str> {
        self.body_html.as_deref()
    }

    /// Returns the administrator-facing description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns whether the template is used when sending.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Substitutes `{{key}}` placeholders in subject and bodies.
    #[must_use]
    pub fn render(&self, variables: &[(&str, &str)]) -> RenderedEmail {
        RenderedEmail {
            subject: render_placeholders(self.subject(), variables),
            text_body: render_placeholders(self.body_text(), variables),
            html_body: self
                .body_html()
                .map(|html| render_placeholders(html, variables)),
        }
    }
}

/// A template after placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    /// Final subject line.
    pub subject: String,
    /// Final text body.
    pub text_body: String,
    /// Final HTML body, if the template has one.
    pub html_body: Option<String>,
}

/// Validates a template name: lowercase ASCII letters, digits and `_`.
pub fn validate_template_name(name: String) -> AppResult<String> {
    let name = name.trim().to_owned();

    if name.is_empty() || name.len() > TEMPLATE_NAME_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "template name must be between 1 and {TEMPLATE_NAME_MAX_LENGTH} characters"
        )));
    }

    if !name
        .chars()
        .all(|character| matches!(character, 'a'..='z' | '0'..='9' | '_'))
    {
        return Err(AppError::Validation(format!(
            "template name '{name}' may only contain lowercase letters, digits and '_'"
        )));
    }

    Ok(name)
}

/// Replaces `{{ key }}` occurrences. Unknown keys are left untouched.
#[must_use]
pub fn render_placeholders(source: &str, variables: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            output.push_str(&rest[start..]);
            return output;
        };

        let key = after_open[..end].trim();
        match variables.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => output.push_str(value),
            None => output.push_str(&rest[start..start + 2 + end + 2]),
        }

        rest = &after_open[end + 2..];
    }

    output.push_str(rest);
    output
}
