//! Reusable test helpers for ledger integration tests.
//!
//! Provides temp-dir ledger stores, an in-memory [`GuildDirectory`] double
//! with failure injection, and audit sinks that collect or fail on demand.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use gk_server::audit::{AuditError, AuditEvent, AuditRecord, AuditSink};
use gk_server::directory::{
    ChannelDenials, DirectoryError, GrantId, GuildDirectory, IdentityId, ResourceId,
};
use gk_server::ledger::LedgerStore;

/// The marker role id the test directory hands out.
pub const MARKER: GrantId = GrantId(9999);

/// A ledger store over a fresh temp directory. Keep the `TempDir` alive for
/// the duration of the test.
pub fn temp_store() -> (tempfile::TempDir, LedgerStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LedgerStore::new(dir.path().join("data.json"), true);
    (dir, store)
}

// ============================================================================
// In-memory guild directory
// ============================================================================

#[derive(Debug, Default)]
struct DirectoryState {
    /// Roles that currently resolve in the directory.
    roles: HashSet<GrantId>,
    /// Non-baseline grants per member.
    member_grants: HashMap<IdentityId, Vec<GrantId>>,
    /// Per-member resource overrides.
    overrides: HashMap<(ResourceId, IdentityId), ChannelDenials>,
    /// Denials applied to the marker role per resource.
    marker_policies: HashMap<ResourceId, ChannelDenials>,
    resources: Vec<ResourceId>,
    marker: Option<GrantId>,
    fail_revoke: bool,
    fail_grant: bool,
}

/// In-memory [`GuildDirectory`] double with failure injection.
pub struct TestDirectory {
    state: Mutex<DirectoryState>,
}

impl TestDirectory {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DirectoryState {
                resources: vec![ResourceId(1), ResourceId(2)],
                ..DirectoryState::default()
            }),
        }
    }

    /// Register a member holding the given grants; the grants are also
    /// registered as resolving roles.
    pub async fn with_member(self, identity: IdentityId, grants: &[GrantId]) -> Self {
        {
            let mut state = self.state.lock().await;
            state.roles.extend(grants.iter().copied());
            state.member_grants.insert(identity, grants.to_vec());
        }
        self
    }

    /// Give the member a per-resource override, as a channel-specific
    /// exception a moderator once set up.
    pub async fn with_override(
        self,
        resource: ResourceId,
        identity: IdentityId,
        denials: ChannelDenials,
    ) -> Self {
        self.state
            .lock()
            .await
            .overrides
            .insert((resource, identity), denials);
        self
    }

    /// Delete a role out from under a snapshot (simulates a role removed
    /// while the member was restricted).
    pub async fn delete_role(&self, grant: GrantId) {
        self.state.lock().await.roles.remove(&grant);
    }

    pub async fn set_fail_revoke(&self, fail: bool) {
        self.state.lock().await.fail_revoke = fail;
    }

    pub async fn set_fail_grant(&self, fail: bool) {
        self.state.lock().await.fail_grant = fail;
    }

    /// Current grants of a member, marker included.
    pub async fn grants_of(&self, identity: IdentityId) -> Vec<GrantId> {
        self.state
            .lock()
            .await
            .member_grants
            .get(&identity)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn has_marker(&self, identity: IdentityId) -> bool {
        self.grants_of(identity).await.contains(&MARKER)
    }

    pub async fn override_count(&self, identity: IdentityId) -> usize {
        self.state
            .lock()
            .await
            .overrides
            .keys()
            .filter(|(_, id)| *id == identity)
            .count()
    }

    /// Resources where the marker role is denied everything.
    pub async fn fully_denied_resources(&self) -> usize {
        self.state
            .lock()
            .await
            .marker_policies
            .values()
            .filter(|d| **d == ChannelDenials::all())
            .count()
    }
}

impl GuildDirectory for TestDirectory {
    async fn list_grants(&self, identity: IdentityId) -> Result<Vec<GrantId>, DirectoryError> {
        let state = self.state.lock().await;
        Ok(state
            .member_grants
            .get(&identity)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|g| Some(*g) != state.marker)
            .collect())
    }

    async fn revoke_grants(
        &self,
        identity: IdentityId,
        grants: &[GrantId],
    ) -> Result<(), DirectoryError> {
        let mut state = self.state.lock().await;
        if state.fail_revoke {
            return Err(DirectoryError::Request("revoke refused".into()));
        }
        if let Some(held) = state.member_grants.get_mut(&identity) {
            held.retain(|g| !grants.contains(g));
        }
        Ok(())
    }

    async fn grant(&self, identity: IdentityId, grant: GrantId) -> Result<(), DirectoryError> {
        let mut state = self.state.lock().await;
        if state.fail_grant {
            return Err(DirectoryError::Request("grant refused".into()));
        }
        if !state.roles.contains(&grant) {
            return Err(DirectoryError::UnknownGrant(grant));
        }
        let held = state.member_grants.entry(identity).or_default();
        if !held.contains(&grant) {
            held.push(grant);
        }
        Ok(())
    }

    async fn grant_exists(&self, grant: GrantId) -> Result<bool, DirectoryError> {
        Ok(self.state.lock().await.roles.contains(&grant))
    }

    async fn ensure_marker_role(&self) -> Result<GrantId, DirectoryError> {
        let mut state = self.state.lock().await;
        if let Some(marker) = state.marker {
            return Ok(marker);
        }
        state.roles.insert(MARKER);
        state.marker = Some(MARKER);
        Ok(MARKER)
    }

    async fn list_resources(&self) -> Result<Vec<ResourceId>, DirectoryError> {
        Ok(self.state.lock().await.resources.clone())
    }

    async fn set_resource_override(
        &self,
        resource: ResourceId,
        identity: IdentityId,
        overrides: Option<ChannelDenials>,
    ) -> Result<(), DirectoryError> {
        let mut state = self.state.lock().await;
        match overrides {
            Some(denials) => {
                state.overrides.insert((resource, identity), denials);
            }
            None => {
                state.overrides.remove(&(resource, identity));
            }
        }
        Ok(())
    }

    async fn set_marker_role_channel_policy(
        &self,
        resource: ResourceId,
        _marker: GrantId,
        denials: ChannelDenials,
    ) -> Result<(), DirectoryError> {
        self.state
            .lock()
            .await
            .marker_policies
            .insert(resource, denials);
        Ok(())
    }
}

// ============================================================================
// Audit sinks
// ============================================================================

/// Sink that stores every record for later assertions.
#[derive(Default)]
pub struct CollectingAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl CollectingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<AuditEvent> {
        self.records
            .lock()
            .await
            .iter()
            .map(|r| r.event.clone())
            .collect()
    }
}

impl AuditSink for CollectingAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

/// Sink whose delivery always fails; operations must still succeed.
pub struct FailingAuditSink;

impl AuditSink for FailingAuditSink {
    async fn record(&self, _record: &AuditRecord) -> Result<(), AuditError> {
        Err(AuditError::Delivery("sink offline".into()))
    }
}
