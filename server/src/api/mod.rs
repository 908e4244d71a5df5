//! Core surface exposed to the command-dispatch layer.
//!
//! The chat front end parses commands and authorizes callers (privileged
//! operations are its concern); each command then resolves to exactly one
//! method here. Mutating methods emit audit events best-effort.

use serde::Serialize;
use tracing::warn;

use crate::audit::{AuditEvent, AuditRecord, AuditSink};
use crate::codes::{self, PoolTotals, RedeemOutcome};
use crate::directory::{GuildDirectory, IdentityId};
use crate::ledger::{LedgerError, LedgerStore};
use crate::moderation::{self, BanOutcome, ModerationError, UnbanOutcome};
use crate::verify::{self, IdentityStatus};

/// Result of a code request, as reported to the member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RequestCodeOutcome {
    /// The identity has not completed verification; no draw was attempted.
    NotCleared,
    /// The identity already holds this code.
    AlreadyAssigned { code: String },
    /// A fresh code was issued.
    Issued { code: String },
    /// No codes remain.
    PoolEmpty,
}

impl From<RedeemOutcome> for RequestCodeOutcome {
    fn from(outcome: RedeemOutcome) -> Self {
        match outcome {
            RedeemOutcome::AlreadyAssigned { code } => Self::AlreadyAssigned { code },
            RedeemOutcome::Issued { code } => Self::Issued { code },
            RedeemOutcome::PoolEmpty => Self::PoolEmpty,
        }
    }
}

/// Shared application state handed to the dispatch layer: the ledger store,
/// the guild directory client, and the audit sink.
pub struct AppState<D, S> {
    store: LedgerStore,
    directory: D,
    audit: S,
}

impl<D: GuildDirectory, S: AuditSink> AppState<D, S> {
    #[must_use]
    pub fn new(store: LedgerStore, directory: D, audit: S) -> Self {
        Self {
            store,
            directory,
            audit,
        }
    }

    /// The underlying ledger store. The external verification service
    /// shares it for its clearance write path.
    #[must_use]
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Clearance + assigned code for one identity.
    pub async fn check_status(&self, identity: IdentityId) -> Result<IdentityStatus, LedgerError> {
        verify::check_status(&self.store, identity).await
    }

    /// Mark an identity as cleared. Called on behalf of the verification
    /// service once the external qualifying condition is confirmed.
    pub async fn mark_cleared(&self, identity: IdentityId) -> Result<(), LedgerError> {
        verify::mark_cleared(&self.store, identity).await?;
        self.emit(AuditEvent::IdentityCleared { identity }).await;
        Ok(())
    }

    /// Request a code for the identity. Clearance is re-checked freshly on
    /// every call; the allocator itself never does.
    pub async fn request_code(
        &self,
        identity: IdentityId,
    ) -> Result<RequestCodeOutcome, LedgerError> {
        if !verify::is_cleared(&self.store, identity).await? {
            return Ok(RequestCodeOutcome::NotCleared);
        }

        let outcome = codes::redeem(&self.store, identity).await?;
        if let RedeemOutcome::Issued { code } = &outcome {
            self.emit(AuditEvent::CodeIssued {
                identity,
                code: code.clone(),
            })
            .await;
        }
        Ok(outcome.into())
    }

    /// Append codes to the pool. Privileged.
    pub async fn add_codes(&self, new_codes: &[String]) -> Result<PoolTotals, LedgerError> {
        let totals = codes::add_codes(&self.store, new_codes).await?;
        self.emit(AuditEvent::CodesAdded {
            added: totals.added,
            total: totals.total,
        })
        .await;
        Ok(totals)
    }

    /// Remove every occurrence of a code from the pool. Privileged.
    pub async fn remove_code(&self, code: &str) -> Result<usize, LedgerError> {
        let removed = codes::remove_code(&self.store, code).await?;
        if removed > 0 {
            self.emit(AuditEvent::CodeRemoved {
                code: code.to_string(),
                removed,
            })
            .await;
        }
        Ok(removed)
    }

    /// Discard the whole pool. Privileged.
    pub async fn clear_pool(&self) -> Result<usize, LedgerError> {
        let removed = codes::clear_pool(&self.store).await?;
        self.emit(AuditEvent::PoolCleared { removed }).await;
        Ok(removed)
    }

    /// The remaining pool, in issue order. Privileged.
    pub async fn list_codes(&self) -> Result<Vec<String>, LedgerError> {
        codes::list_codes(&self.store).await
    }

    /// Remaining pool size.
    pub async fn count_codes(&self) -> Result<usize, LedgerError> {
        codes::count_codes(&self.store).await
    }

    /// Restrict a member. Privileged.
    pub async fn ban(&self, target: Option<IdentityId>) -> Result<BanOutcome, ModerationError> {
        let outcome = moderation::ban(&self.store, &self.directory, target).await?;
        if let (BanOutcome::Restricted { snapshotted }, Some(identity)) = (&outcome, target) {
            self.emit(AuditEvent::MemberRestricted {
                identity,
                grants: snapshotted.len(),
            })
            .await;
        }
        Ok(outcome)
    }

    /// Lift a member's restriction. Privileged.
    pub async fn unban(&self, target: Option<IdentityId>) -> Result<UnbanOutcome, ModerationError> {
        let outcome = moderation::unban(&self.store, &self.directory, target).await?;
        if let (UnbanOutcome::Restored { restored, stale }, Some(identity)) = (&outcome, target) {
            self.emit(AuditEvent::MemberReinstated {
                identity,
                restored: restored.len(),
                stale: stale.len(),
            })
            .await;
        }
        Ok(outcome)
    }

    /// Best-effort audit emission: failures are logged and never propagate.
    async fn emit(&self, event: AuditEvent) {
        let record = AuditRecord::new(event);
        if let Err(e) = self.audit.record(&record).await {
            warn!("failed to deliver audit event: {e}");
        }
    }
}
