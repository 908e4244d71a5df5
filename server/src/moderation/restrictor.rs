//! Ban/unban transitions.
//!
//! Ordering invariant: the grant snapshot is durably persisted BEFORE any
//! external permission change is requested, and the ban record is deleted
//! only AFTER the external restore calls succeeded. A crash or directory
//! failure in between always leaves a recoverable snapshot behind, never a
//! stripped member with no record of what they held.

use tracing::info;

use crate::directory::{ChannelDenials, GuildDirectory, IdentityId};
use crate::ledger::LedgerStore;

use super::types::{BanOutcome, ModerationError, UnbanOutcome};

/// Restrict a member: snapshot their current non-baseline grants, strip
/// them, and apply the marker role with full channel denials.
///
/// Re-banning an already-restricted identity returns
/// [`BanOutcome::AlreadyRestricted`] and never overwrites the snapshot.
pub async fn ban<D: GuildDirectory>(
    store: &LedgerStore,
    directory: &D,
    target: Option<IdentityId>,
) -> Result<BanOutcome, ModerationError> {
    let identity = target.ok_or(ModerationError::MissingTarget)?;
    let key = identity.to_string();

    let grants = directory.list_grants(identity).await?;

    // Guarded snapshot: the existence check and the insert share one
    // critical section, so two racing bans cannot both snapshot.
    let snapshot = store
        .update(|doc| {
            if doc.banned.contains_key(&key) {
                None
            } else {
                doc.banned.insert(key.clone(), grants.clone());
                Some(grants)
            }
        })
        .await?;

    let Some(snapshot) = snapshot else {
        return Ok(BanOutcome::AlreadyRestricted);
    };

    // Snapshot is durable; only now touch the directory.
    if !snapshot.is_empty() {
        directory.revoke_grants(identity, &snapshot).await?;
    }

    let marker = directory.ensure_marker_role().await?;
    for resource in directory.list_resources().await? {
        directory
            .set_marker_role_channel_policy(resource, marker, ChannelDenials::all())
            .await?;
        directory.set_resource_override(resource, identity, None).await?;
    }
    directory.grant(identity, marker).await?;

    info!(%identity, grants = snapshot.len(), "member restricted");
    Ok(BanOutcome::Restricted {
        snapshotted: snapshot,
    })
}

/// Lift a restriction: remove the marker role, clear per-resource
/// overrides, and re-apply every snapshotted grant that still resolves.
///
/// Stale grant handles (deleted in the directory since the ban) are skipped
/// silently and reported in the outcome. The ban record is deleted only
/// after the directory calls succeeded; on failure it is retained so the
/// member is never orphaned without a recovery path.
pub async fn unban<D: GuildDirectory>(
    store: &LedgerStore,
    directory: &D,
    target: Option<IdentityId>,
) -> Result<UnbanOutcome, ModerationError> {
    let identity = target.ok_or(ModerationError::MissingTarget)?;
    let key = identity.to_string();

    let Some(snapshot) = store.load().await?.banned.get(&key).cloned() else {
        return Ok(UnbanOutcome::NotRestricted);
    };

    let marker = directory.ensure_marker_role().await?;
    directory.revoke_grants(identity, &[marker]).await?;

    for resource in directory.list_resources().await? {
        directory.set_resource_override(resource, identity, None).await?;
    }

    let mut restored = Vec::new();
    let mut stale = Vec::new();
    for grant in snapshot {
        if directory.grant_exists(grant).await? {
            directory.grant(identity, grant).await?;
            restored.push(grant);
        } else {
            stale.push(grant);
        }
    }

    store
        .update(|doc| {
            doc.banned.remove(&key);
        })
        .await?;

    info!(%identity, restored = restored.len(), stale = stale.len(), "member reinstated");
    Ok(UnbanOutcome::Restored { restored, stale })
}
