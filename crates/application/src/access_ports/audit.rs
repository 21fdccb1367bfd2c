use async_trait::async_trait;
use taskhub_core::{AppResult, Scope};
use taskhub_domain::{AuditAction, UserId};

/// Immutable audit event payload emitted by application services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Organization or team the event belongs to.
    pub scope: Scope,
    /// User that performed the action.
    pub actor: UserId,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

/// Hook for append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Records one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}
