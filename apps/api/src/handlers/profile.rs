use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use rolegate_application::AuthenticatedUser;

use crate::dto::{ChangePasswordRequest, ProfileResponse, UpdateProfileRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ProfileResponse>> {
    let record = state.user_service.profile(user.user_id()).await?;

    Ok(Json(ProfileResponse::new(record, &user)))
}

pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let record = state
        .user_service
        .update_profile(user.user_id(), &payload.first_name, &payload.last_name)
        .await?;

    Ok(Json(ProfileResponse::new(record, &user)))
}

pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .change_password(
            user.user_id(),
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
