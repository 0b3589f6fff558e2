use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use rolegate_application::AuthenticatedUser;
use rolegate_domain::EmailTemplateId;

use crate::dto::{EmailTemplateResponse, SaveEmailTemplateRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_id;

pub async fn list_email_templates_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<EmailTemplateResponse>>> {
    let templates = state
        .email_template_service
        .list_templates(&user)
        .await?
        .into_iter()
        .map(EmailTemplateResponse::from)
        .collect();

    Ok(Json(templates))
}

pub async fn create_email_template_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<SaveEmailTemplateRequest>,
) -> ApiResult<(StatusCode, Json<EmailTemplateResponse>)> {
    let template = state
        .email_template_service
        .create_template(&user, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(EmailTemplateResponse::from(template))))
}

pub async fn get_email_template_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(template_id): Path<String>,
) -> ApiResult<Json<EmailTemplateResponse>> {
    let template = state
        .email_template_service
        .get_template(&user, parse_id::<EmailTemplateId>(&template_id)?)
        .await?;

    Ok(Json(EmailTemplateResponse::from(template)))
}

pub async fn update_email_template_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(template_id): Path<String>,
    Json(payload): Json<SaveEmailTemplateRequest>,
) -> ApiResult<Json<EmailTemplateResponse>> {
    let template = state
        .email_template_service
        .update_template(
            &user,
            parse_id::<EmailTemplateId>(&template_id)?,
            payload.into(),
        )
        .await?;

    Ok(Json(EmailTemplateResponse::from(template)))
}

pub async fn delete_email_template_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(template_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .email_template_service
        .delete_template(&user, parse_id::<EmailTemplateId>(&template_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
