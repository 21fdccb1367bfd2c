use async_trait::async_trait;
use tracing::info;

use taskhub_application::{AuditEvent, AuditRepository};
use taskhub_core::AppResult;

/// Audit sink that writes every event to the structured log under the
/// `taskhub::audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditRepository;

impl TracingAuditRepository {
    /// Creates the log-backed audit sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditRepository for TracingAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        info!(
            target: "taskhub::audit",
            action = event.action.as_str(),
            scope_kind = event.scope.kind().as_str(),
            scope_id = %event.scope.id(),
            actor = %event.actor,
            resource_type = event.resource_type.as_str(),
            resource_id = event.resource_id.as_str(),
            detail = event.detail.as_deref().unwrap_or_default(),
            "audit event"
        );

        Ok(())
    }
}
