//! Moderation Types

use serde::Serialize;
use thiserror::Error;

use crate::directory::{DirectoryError, GrantId};
use crate::ledger::LedgerError;

/// Result of a ban request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BanOutcome {
    /// The identity is now restricted; these grants were snapshotted and
    /// stripped, in directory order.
    Restricted { snapshotted: Vec<GrantId> },

    /// The identity was already restricted. The existing snapshot is left
    /// untouched: overwriting it with an already-stripped grant set would
    /// lose the member's original grants forever.
    AlreadyRestricted,
}

/// Result of an unban request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UnbanOutcome {
    /// The identity is back to normal.
    Restored {
        /// Grants re-applied from the snapshot.
        restored: Vec<GrantId>,
        /// Snapshotted grants that no longer resolve in the directory and
        /// were skipped.
        stale: Vec<GrantId>,
    },

    /// No ban record exists; nothing to do.
    NotRestricted,
}

#[derive(Debug, Error)]
pub enum ModerationError {
    /// The command named no target member.
    #[error("no target member was supplied")]
    MissingTarget,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A guild directory call failed. The ledger keeps the ban record, so
    /// the operation can be retried; the caller should report partial
    /// completion rather than claiming success.
    #[error("guild directory call failed: {0}")]
    Directory(#[from] DirectoryError),
}
