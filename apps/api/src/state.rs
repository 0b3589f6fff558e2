use rolegate_application::{
    AuditLogService, AuthenticationService, EmailTemplateService, PasswordResetService,
    SecurityAdminService, UserService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub authentication_service: AuthenticationService,
    pub security_admin_service: SecurityAdminService,
    pub password_reset_service: PasswordResetService,
    pub email_template_service: EmailTemplateService,
    pub audit_log_service: AuditLogService,
}
