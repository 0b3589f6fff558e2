use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use rolegate_application::{AuthenticatedUser, CreateRoleInput, UpdateRoleInput};
use rolegate_domain::{PermissionId, RoleId};

use crate::dto::{CreateRoleRequest, RoleResponse, SetRolePermissionsRequest, UpdateRoleRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_id;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .security_admin_service
        .list_roles(&user)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .security_admin_service
        .create_role(
            &user,
            CreateRoleInput {
                name: payload.name,
                description: payload.description,
                permissions: payload.permissions,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .get_role(&user, parse_id::<RoleId>(&role_id)?)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(role_id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .update_role(
            &user,
            parse_id::<RoleId>(&role_id)?,
            UpdateRoleInput {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .delete_role(&user, parse_id::<RoleId>(&role_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_role_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(role_id): Path<String>,
    Json(payload): Json<SetRolePermissionsRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .set_role_permissions(&user, parse_id::<RoleId>(&role_id)?, payload.permissions)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn attach_role_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((role_id, permission_id)): Path<(String, String)>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .attach_permission(
            &user,
            parse_id::<RoleId>(&role_id)?,
            parse_id::<PermissionId>(&permission_id)?,
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn detach_role_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((role_id, permission_id)): Path<(String, String)>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .detach_permission(
            &user,
            parse_id::<RoleId>(&role_id)?,
            parse_id::<PermissionId>(&permission_id)?,
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}
