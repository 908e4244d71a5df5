//! Access Restrictor
//!
//! Reversible soft-ban: snapshot a member's current grants, strip them, and
//! apply a restricted marker role; on unban restore the snapshot exactly.
//! Per identity this is a two-state machine, `Normal ⇄ Restricted`, with no
//! nesting or levels.

mod restrictor;
mod types;

pub use restrictor::{ban, unban};
pub use types::{BanOutcome, ModerationError, UnbanOutcome};
