//! Ledger document models.
//!
//! One JSON document is the unit of atomic persistence. The schema is
//! additive-only: every collection carries a serde default so documents
//! written by older revisions keep loading without migrations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::directory::GrantId;

/// Per-identity entitlement record, keyed in the document by the string form
/// of the identity's integer handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Whether the identity has satisfied the external qualifying condition.
    /// Set only by the verification service's write path.
    #[serde(default)]
    pub verified: bool,

    /// The single-use code assigned to this identity. Once set it never
    /// changes and is never cleared by normal operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// The aggregate durable state: identities, the FIFO code pool, and ban
/// snapshots. Loaded fresh at the start of every operation and replaced
/// wholesale on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerDocument {
    /// Identity records keyed by identity id (string form).
    #[serde(default)]
    pub identities: BTreeMap<String, IdentityRecord>,

    /// Unassigned codes, order-significant: index 0 is issued first.
    #[serde(default)]
    pub codes: Vec<String>,

    /// Grant snapshots for currently restricted identities, keyed by
    /// identity id. A key exists here iff the identity is restricted.
    #[serde(default)]
    pub banned: BTreeMap<String, Vec<GrantId>>,
}

impl LedgerDocument {
    /// Look up an identity record without creating it.
    #[must_use]
    pub fn identity(&self, key: &str) -> Option<&IdentityRecord> {
        self.identities.get(key)
    }
}
