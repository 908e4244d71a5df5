//! Guild Directory Service boundary.
//!
//! The directory owns the guild's role/permission primitives (role creation,
//! per-channel overwrites); this module only defines the identifiers and the
//! contract the core calls across. Every call is fallible and must be
//! surfaced to the caller, never assumed successful.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque stable handle for a person interacting with the system
/// (e.g., a platform account id).
///
/// The ledger document keys its collections by the string form of this
/// integer handle, via [`fmt::Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(pub u64);

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for IdentityId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Identifier for a permission bundle the directory can attach to an
/// identity (a role).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantId(pub u64);

impl fmt::Display for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier for a guild resource grants can be scoped to (a channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Channel policy
// ============================================================================

bitflags! {
    /// Per-resource denials applied to a principal (role or member).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct ChannelDenials: u8 {
        /// Deny viewing the resource.
        const VIEW    = 1 << 0;
        /// Deny sending messages in the resource.
        const SEND    = 1 << 1;
        /// Deny reading the resource's message history.
        const HISTORY = 1 << 2;
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Failure talking to the guild directory.
///
/// Directory calls cross a network boundary; a failure here must never be
/// treated as if the grant/revoke succeeded.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Request(String),

    #[error("insufficient directory permissions")]
    Forbidden,

    #[error("unknown grant: {0}")]
    UnknownGrant(GrantId),

    #[error("directory request timed out")]
    Timeout,
}

// ============================================================================
// Service Contract
// ============================================================================

/// Contract toward the external Guild Directory Service.
///
/// Implementations live outside the core (the chat platform client); tests
/// use an in-memory double.
pub trait GuildDirectory: Send + Sync {
    /// Current grants held by the identity, excluding the implicit baseline
    /// grant shared by all members, in the directory's order.
    fn list_grants(
        &self,
        identity: IdentityId,
    ) -> impl std::future::Future<Output = Result<Vec<GrantId>, DirectoryError>> + Send;

    /// Revoke each of the given grants from the identity.
    fn revoke_grants(
        &self,
        identity: IdentityId,
        grants: &[GrantId],
    ) -> impl std::future::Future<Output = Result<(), DirectoryError>> + Send;

    /// Attach a grant to the identity.
    fn grant(
        &self,
        identity: IdentityId,
        grant: GrantId,
    ) -> impl std::future::Future<Output = Result<(), DirectoryError>> + Send;

    /// Whether a grant handle still resolves in the directory.
    /// Stale handles from old snapshots are skipped on restore.
    fn grant_exists(
        &self,
        grant: GrantId,
    ) -> impl std::future::Future<Output = Result<bool, DirectoryError>> + Send;

    /// Find or create the marker role whose presence signals "restricted".
    /// Idempotent.
    fn ensure_marker_role(
        &self,
    ) -> impl std::future::Future<Output = Result<GrantId, DirectoryError>> + Send;

    /// All resources (channels) of the guild.
    fn list_resources(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ResourceId>, DirectoryError>> + Send;

    /// Replace the identity's per-resource override, or clear it with `None`.
    /// Idempotent.
    fn set_resource_override(
        &self,
        resource: ResourceId,
        identity: IdentityId,
        overrides: Option<ChannelDenials>,
    ) -> impl std::future::Future<Output = Result<(), DirectoryError>> + Send;

    /// Apply denials for the marker role on a resource. Idempotent.
    fn set_marker_role_channel_policy(
        &self,
        resource: ResourceId,
        marker: GrantId,
        denials: ChannelDenials,
    ) -> impl std::future::Future<Output = Result<(), DirectoryError>> + Send;
}

impl<D: GuildDirectory> GuildDirectory for std::sync::Arc<D> {
    async fn list_grants(&self, identity: IdentityId) -> Result<Vec<GrantId>, DirectoryError> {
        (**self).list_grants(identity).await
    }

    async fn revoke_grants(
        &self,
        identity: IdentityId,
        grants: &[GrantId],
    ) -> Result<(), DirectoryError> {
        (**self).revoke_grants(identity, grants).await
    }

    async fn grant(&self, identity: IdentityId, grant: GrantId) -> Result<(), DirectoryError> {
        (**self).grant(identity, grant).await
    }

    async fn grant_exists(&self, grant: GrantId) -> Result<bool, DirectoryError> {
        (**self).grant_exists(grant).await
    }

    async fn ensure_marker_role(&self) -> Result<GrantId, DirectoryError> {
        (**self).ensure_marker_role().await
    }

    async fn list_resources(&self) -> Result<Vec<ResourceId>, DirectoryError> {
        (**self).list_resources().await
    }

    async fn set_resource_override(
        &self,
        resource: ResourceId,
        identity: IdentityId,
        overrides: Option<ChannelDenials>,
    ) -> Result<(), DirectoryError> {
        (**self).set_resource_override(resource, identity, overrides).await
    }

    async fn set_marker_role_channel_policy(
        &self,
        resource: ResourceId,
        marker: GrantId,
        denials: ChannelDenials,
    ) -> Result<(), DirectoryError> {
        (**self)
            .set_marker_role_channel_policy(resource, marker, denials)
            .await
    }
}
