//! Notification/Audit Sink
//!
//! Best-effort side channel reporting state transitions to operators.
//! A sink failure is logged and swallowed at the call site; it must never
//! roll back or fail the ledger operation that produced the event.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::directory::IdentityId;

/// A state transition worth reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditEvent {
    CodesAdded { added: usize, total: usize },
    CodeRemoved { code: String, removed: usize },
    PoolCleared { removed: usize },
    CodeIssued { identity: IdentityId, code: String },
    IdentityCleared { identity: IdentityId },
    MemberRestricted { identity: IdentityId, grants: usize },
    MemberReinstated { identity: IdentityId, restored: usize, stale: usize },
}

/// An audit event stamped with an id and emission time.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: AuditEvent,
}

impl AuditRecord {
    #[must_use]
    pub fn new(event: AuditEvent) -> Self {
        Self {
            id: Uuid::now_v7(),
            at: Utc::now(),
            event,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit delivery failed: {0}")]
    Delivery(String),
}

/// Delivery channel for audit records.
pub trait AuditSink: Send + Sync {
    fn record(
        &self,
        record: &AuditRecord,
    ) -> impl std::future::Future<Output = Result<(), AuditError>> + Send;
}

impl<S: AuditSink> AuditSink for std::sync::Arc<S> {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        (**self).record(record).await
    }
}

/// Sink that emits records as structured JSON log lines under the `audit`
/// target. Always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        match serde_json::to_string(&record) {
            Ok(json) => tracing::info!(target: "audit", %json, "audit event"),
            Err(e) => tracing::warn!(target: "audit", error = %e, "unserializable audit event"),
        }
        Ok(())
    }
}
