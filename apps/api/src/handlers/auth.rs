use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use rolegate_application::{AuthOutcome, RegisterParams};
use rolegate_core::AppError;

use crate::dto::{
    ForgotPasswordRequest, GenericMessageResponse, LoginRequest, LoginResponse, RegisterRequest,
    ResetPasswordRequest, UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .register(RegisterParams {
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = match state
        .user_service
        .login(&payload.email, &payload.password)
        .await?
    {
        AuthOutcome::Authenticated(user) => user,
        AuthOutcome::Failed => {
            return Err(AppError::Unauthorized("invalid email or password".to_owned()).into());
        }
    };

    let token = state.authentication_service.issue_token(&user)?;

    Ok(Json(LoginResponse::new(token, UserResponse::from(user))))
}

/// Always answers 202 so the response does not reveal whether the email is registered.
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<(StatusCode, Json<GenericMessageResponse>)> {
    if let Err(error) = state
        .password_reset_service
        .request_password_reset(&payload.email)
        .await
    {
        tracing::warn!(%error, "password reset request failed");
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(GenericMessageResponse {
            message: "if the address is registered, a reset link has been sent".to_owned(),
        }),
    ))
}

pub async fn reset_password_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .password_reset_service
        .reset_password(&payload.token, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
