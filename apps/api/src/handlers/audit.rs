use axum::Json;
use axum::extract::{Extension, Query, State};
use rolegate_application::{AuditLogQuery, AuthenticatedUser};

use crate::dto::{AuditLogEntryResponse, PaginationQuery};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let entries = state
        .audit_log_service
        .list_recent_entries(
            &user,
            AuditLogQuery {
                limit: pagination.limit(),
                offset: pagination.offset(),
            },
        )
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
