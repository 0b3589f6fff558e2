use chrono::{DateTime, Utc};
use rolegate_application::{AuthenticatedUser, UserPage, UserRecord};
use rolegate_domain::RoleGrant;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a user account. The password hash never leaves the server.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub is_active: bool,
    pub locked_until: Option<String>,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(value: UserRecord) -> Self {
        Self {
            id: value.id.to_string(),
            display_name: value.display_name(),
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            is_active: value.is_active,
            locked_until: value.locked_until.map(|instant| instant.to_rfc3339()),
            last_login_at: value.last_login_at.map(|instant| instant.to_rfc3339()),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// One page of users.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-list-response.ts"
)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
    pub limit: usize,
    pub offset: usize,
}

impl UserListResponse {
    pub fn new(page: UserPage, limit: usize, offset: usize) -> Self {
        Self {
            users: page.users.into_iter().map(UserResponse::from).collect(),
            total: page.total,
            limit,
            offset,
        }
    }
}

/// The caller's account with its effective access.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/profile-response.ts"
)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl ProfileResponse {
    pub fn new(user: UserRecord, caller: &AuthenticatedUser) -> Self {
        Self {
            user: UserResponse::from(user),
            roles: caller.access().roles().iter().cloned().collect(),
            permissions: caller.access().permissions().iter().cloned().collect(),
        }
    }
}

/// Incoming payload for self-service profile updates.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-profile-request.ts"
)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
}

/// Incoming payload for changing one's own password.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/change-password-request.ts"
)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Incoming payload for administrator account creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Incoming payload for administrator account updates. Omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-user-request.ts"
)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

/// A role granted to a user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-grant-response.ts"
)]
pub struct RoleGrantResponse {
    pub role_id: String,
    pub role_name: String,
    pub granted_at: String,
    pub granted_by: Option<String>,
    pub expires_at: Option<String>,
    pub active: bool,
}

impl RoleGrantResponse {
    pub fn at(grant: RoleGrant, now: DateTime<Utc>) -> Self {
        Self {
            active: grant.is_active_at(now),
            role_id: grant.role_id.to_string(),
            role_name: grant.role_name,
            granted_at: grant.granted_at.to_rfc3339(),
            granted_by: grant.granted_by.map(|user_id| user_id.to_string()),
            expires_at: grant.expires_at.map(|instant| instant.to_rfc3339()),
        }
    }
}

/// Incoming payload for granting a role to a user.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/grant-role-request.ts"
)]
pub struct GrantRoleRequest {
    pub role_id: String,
    pub expires_at: Option<String>,
}
