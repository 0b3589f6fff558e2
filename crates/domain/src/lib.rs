//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod email_template;
mod ids;
mod security;
mod user;

pub use access::{AccessContext, AccessRequirement, RoleMatch};
pub use email_template::{
    EmailTemplate, PASSWORD_RESET_TEMPLATE, RenderedEmail, TEMPLATE_NAME_MAX_LENGTH,
    render_placeholders, validate_template_name,
};
pub use ids::{EmailTemplateId, PermissionId, RoleId, UserId};
pub use security::{
    AuditAction, PermissionName, ROLE_NAME_MAX_LENGTH, RoleGrant, RoleName, SystemPermission,
};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, display_name, validate_password,
};
