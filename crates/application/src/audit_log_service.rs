use std::sync::Arc;

use rolegate_core::AppResult;
use rolegate_domain::SystemPermission;

use crate::{AuditLogEntry, AuditLogQuery, AuditRepository, AuthenticatedUser};

/// Largest page the audit log listing returns.
pub const AUDIT_LOG_MAX_LIMIT: usize = 500;

/// Read access to the audit trail.
#[derive(Clone)]
pub struct AuditLogService {
    repository: Arc<dyn AuditRepository>,
}

impl AuditLogService {
    /// Creates a new audit log service.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditRepository>) -> Self {
        Self { repository }
    }

    /// Lists recent audit entries, newest first.
    pub async fn list_recent_entries(
        &self,
        actor: &AuthenticatedUser,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        actor.require_permission(SystemPermission::AuditRead.as_str())?;

        self.repository
            .list_recent_entries(AuditLogQuery {
                limit: query.limit.clamp(1, AUDIT_LOG_MAX_LIMIT),
                offset: query.offset,
            })
            .await
    }
}
