//! Verification Gate
//!
//! Answers "is this identity cleared to redeem?" from the ledger. Clearance
//! is only ever set by the external verification service after it confirms
//! the identity's qualifying condition; [`mark_cleared`] is that service's
//! write path into the store and uses the same load→mutate→save discipline
//! as every other mutation so it cannot clobber concurrent allocator writes.

use serde::Serialize;

use crate::directory::IdentityId;
use crate::ledger::{LedgerError, LedgerStore};

/// Clearance and assignment status for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityStatus {
    pub cleared: bool,
    pub code: Option<String>,
}

/// Whether the identity is cleared to redeem. Pure read; safe to call
/// before any record exists (absent record or absent flag means false).
pub async fn is_cleared(store: &LedgerStore, identity: IdentityId) -> Result<bool, LedgerError> {
    let doc = store.load().await?;
    Ok(doc
        .identity(&identity.to_string())
        .is_some_and(|r| r.verified))
}

/// Mark the identity as cleared. Invoked by the external verification
/// service once the qualifying condition has been confirmed.
pub async fn mark_cleared(store: &LedgerStore, identity: IdentityId) -> Result<(), LedgerError> {
    store
        .update(|doc| {
            doc.identities.entry(identity.to_string()).or_default().verified = true;
        })
        .await
}

/// Combined clearance + assignment view, as reported to the identity.
pub async fn check_status(
    store: &LedgerStore,
    identity: IdentityId,
) -> Result<IdentityStatus, LedgerError> {
    let doc = store.load().await?;
    let record = doc.identity(&identity.to_string());
    Ok(IdentityStatus {
        cleared: record.is_some_and(|r| r.verified),
        code: record.and_then(|r| r.code.clone()),
    })
}
