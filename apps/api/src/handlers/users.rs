use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use rolegate_application::{
    AuthenticatedUser, CreateUserInput, GrantRoleInput, UpdateUserInput, UserListQuery,
};
use rolegate_core::AppError;
use rolegate_domain::{RoleId, UserId};

use crate::dto::{
    CreateUserRequest, GrantRoleRequest, PaginationQuery, RoleGrantResponse, UpdateUserRequest,
    UserListResponse, UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_id;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<Json<UserListResponse>> {
    let query = UserListQuery {
        limit: pagination.limit(),
        offset: pagination.offset(),
    };
    let page = state.user_service.list_users(&user, query).await?;

    Ok(Json(UserListResponse::new(page, query.limit, query.offset)))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let created = state
        .user_service
        .create_user(
            &user,
            CreateUserInput {
                email: payload.email,
                password: payload.password,
                first_name: payload.first_name,
                last_name: payload.last_name,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let record = state
        .user_service
        .get_user(&user, parse_id::<UserId>(&user_id)?)
        .await?;

    Ok(Json(UserResponse::from(record)))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let record = state
        .user_service
        .update_user(
            &user,
            parse_id::<UserId>(&user_id)?,
            UpdateUserInput {
                email: payload.email,
                first_name: payload.first_name,
                last_name: payload.last_name,
                is_active: payload.is_active,
                password: payload.password,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(record)))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .delete_user(&user, parse_id::<UserId>(&user_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_user_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<RoleGrantResponse>>> {
    let now = Utc::now();
    let grants = state
        .security_admin_service
        .list_user_grants(&user, parse_id::<UserId>(&user_id)?)
        .await?
        .into_iter()
        .map(|grant| RoleGrantResponse::at(grant, now))
        .collect();

    Ok(Json(grants))
}

pub async fn grant_user_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    Json(payload): Json<GrantRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleGrantResponse>)> {
    let expires_at = payload
        .expires_at
        .as_deref()
        .map(parse_timestamp)
        .transpose()?;

    let grant = state
        .security_admin_service
        .grant_role(
            &user,
            parse_id::<UserId>(&user_id)?,
            GrantRoleInput {
                role_id: parse_id::<RoleId>(&payload.role_id)?,
                expires_at,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RoleGrantResponse::at(grant, Utc::now())),
    ))
}

pub async fn revoke_user_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((user_id, role_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .revoke_role(
            &user,
            parse_id::<UserId>(&user_id)?,
            parse_id::<RoleId>(&role_id)?,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|error| AppError::Validation(format!("invalid timestamp '{value}': {error}")))
}
