use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use rolegate_application::{AuthenticatedUser, CreatePermissionInput};
use rolegate_domain::PermissionId;

use crate::dto::{CreatePermissionRequest, PermissionResponse, UpdatePermissionRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_id;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .security_admin_service
        .list_permissions(&user)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let permission = state
        .security_admin_service
        .create_permission(
            &user,
            CreatePermissionInput {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(permission_id): Path<String>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .security_admin_service
        .get_permission(&user, parse_id::<PermissionId>(&permission_id)?)
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn update_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(permission_id): Path<String>,
    Json(payload): Json<UpdatePermissionRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .security_admin_service
        .update_permission(
            &user,
            parse_id::<PermissionId>(&permission_id)?,
            &payload.description,
        )
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(permission_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .delete_permission(&user, parse_id::<PermissionId>(&permission_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
