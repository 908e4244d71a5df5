//! Exactly-once FIFO code assignment and pool administration.

use crate::directory::IdentityId;
use crate::ledger::{LedgerError, LedgerStore};

use super::types::{PoolTotals, RedeemOutcome};

/// Redeem a code for the identity.
///
/// Idempotent: an identity that already holds a code always gets that same
/// code back. Otherwise the pool head (lowest insertion index) is drawn,
/// recorded on the identity, and persisted in one atomic rewrite. An empty
/// pool returns [`RedeemOutcome::PoolEmpty`] without mutating the document —
/// no identity record is created on that path.
///
/// Clearance is NOT re-checked here; the caller gates redemption behind a
/// fresh [`crate::verify::is_cleared`] check.
pub async fn redeem(
    store: &LedgerStore,
    identity: IdentityId,
) -> Result<RedeemOutcome, LedgerError> {
    store
        .update(|doc| {
            let key = identity.to_string();

            if let Some(code) = doc.identity(&key).and_then(|r| r.code.clone()) {
                return RedeemOutcome::AlreadyAssigned { code };
            }

            if doc.codes.is_empty() {
                return RedeemOutcome::PoolEmpty;
            }

            let code = doc.codes.remove(0);
            doc.identities.entry(key).or_default().code = Some(code.clone());
            RedeemOutcome::Issued { code }
        })
        .await
}

/// Append codes to the tail of the pool. Privileged.
pub async fn add_codes(store: &LedgerStore, codes: &[String]) -> Result<PoolTotals, LedgerError> {
    store
        .update(|doc| {
            doc.codes.extend(codes.iter().cloned());
            PoolTotals {
                added: codes.len(),
                total: doc.codes.len(),
            }
        })
        .await
}

/// Remove every occurrence of `code` from the pool, returning how many were
/// removed. Privileged.
pub async fn remove_code(store: &LedgerStore, code: &str) -> Result<usize, LedgerError> {
    store
        .update(|doc| {
            let before = doc.codes.len();
            doc.codes.retain(|c| c != code);
            before - doc.codes.len()
        })
        .await
}

/// Empty the pool, returning how many codes were discarded. Privileged.
/// Assigned codes are untouched.
pub async fn clear_pool(store: &LedgerStore) -> Result<usize, LedgerError> {
    store
        .update(|doc| {
            let removed = doc.codes.len();
            doc.codes.clear();
            removed
        })
        .await
}

/// Number of unassigned codes remaining.
pub async fn count_codes(store: &LedgerStore) -> Result<usize, LedgerError> {
    Ok(store.load().await?.codes.len())
}

/// The full unassigned pool, in issue order. Privileged.
pub async fn list_codes(store: &LedgerStore) -> Result<Vec<String>, LedgerError> {
    Ok(store.load().await?.codes)
}
