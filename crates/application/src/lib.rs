//! Application services and ports.

#![forbid(unsafe_code)]

mod access_token;
mod audit_log_service;
mod audit_ports;
mod authentication_service;
mod authorization_service;
mod email_ports;
mod email_template_service;
mod password_reset_service;
mod security_admin_ports;
mod security_admin_service;
mod user_service;

#[cfg(test)]
mod test_support;

pub use access_token::{AccessTokenClaims, AccessTokenService, IssuedAccessToken};
pub use audit_log_service::{AUDIT_LOG_MAX_LIMIT, AuditLogService};
pub use audit_ports::{AuditEvent, AuditLogEntry, AuditLogQuery, AuditRepository};
pub use authentication_service::AuthenticationService;
pub use authorization_service::{
    AuthenticatedUser, AuthorizationRepository, AuthorizationService,
};
pub use email_ports::{EmailService, EmailTemplateRecord, EmailTemplateRepository};
pub use email_template_service::{EmailTemplateService, SaveEmailTemplateInput};
pub use password_reset_service::{
    PASSWORD_RESET_REQUESTS_PER_HOUR, PasswordResetService, PasswordResetTokenRecord,
    PasswordResetTokenRepository,
};
pub use security_admin_ports::{
    NewRole, PermissionRecord, RoleRecord, SecurityAdminRepository,
};
pub use security_admin_service::{
    CreatePermissionInput, CreateRoleInput, GrantRoleInput, SecurityAdminService,
    UpdateRoleInput,
};
pub use user_service::{
    AuthOutcome, CreateUserInput, LOCKOUT_MINUTES, MAX_FAILED_LOGINS, NewUser, PasswordHasher,
    RegisterParams, USER_LIST_MAX_LIMIT, UpdateUserInput, UserAccountUpdate, UserListQuery,
    UserPage, UserProfileUpdate, UserRecord, UserRepository, UserService,
};
