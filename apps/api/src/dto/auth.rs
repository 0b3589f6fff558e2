use rolegate_application::IssuedAccessToken;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::UserResponse;

/// Incoming payload for self-service registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-request.ts"
)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Incoming payload for email/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Bearer credential issued on a successful login.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: String,
    pub user: UserResponse,
}

impl LoginResponse {
    pub fn new(token: IssuedAccessToken, user: UserResponse) -> Self {
        Self {
            access_token: token.token,
            token_type: "Bearer".to_owned(),
            expires_at: token.expires_at.to_rfc3339(),
            user,
        }
    }
}

/// Incoming payload for requesting a password reset email.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/forgot-password-request.ts"
)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Incoming payload for completing a password reset.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reset-password-request.ts"
)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}
