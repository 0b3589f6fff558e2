mod auth;
mod common;
mod email_templates;
mod security;
mod users;

pub use auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
};
pub use common::{GenericMessageResponse, HealthResponse, PaginationQuery};
pub use email_templates::{EmailTemplateResponse, SaveEmailTemplateRequest};
pub use security::{
    AuditLogEntryResponse, CreatePermissionRequest, CreateRoleRequest, PermissionResponse,
    RoleResponse, SetRolePermissionsRequest, UpdatePermissionRequest, UpdateRoleRequest,
};
pub use users::{
    ChangePasswordRequest, CreateUserRequest, GrantRoleRequest, ProfileResponse,
    RoleGrantResponse, UpdateProfileRequest, UpdateUserRequest, UserListResponse, UserResponse,
};
