//! Allocator Types

use serde::Serialize;

/// Result of a redeem attempt. All three are normal outcomes, not errors;
/// the caller reports them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RedeemOutcome {
    /// The identity already holds a code; the same code is returned on
    /// every subsequent call and a second draw never happens.
    AlreadyAssigned { code: String },

    /// A code was drawn from the pool head and recorded for the identity.
    Issued { code: String },

    /// The pool is empty. Nothing was mutated.
    PoolEmpty,
}

impl RedeemOutcome {
    /// The code carried by this outcome, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::AlreadyAssigned { code } | Self::Issued { code } => Some(code),
            Self::PoolEmpty => None,
        }
    }
}

/// Counts reported after adding codes to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolTotals {
    /// How many codes this operation appended.
    pub added: usize,
    /// Pool size after the append.
    pub total: usize,
}
