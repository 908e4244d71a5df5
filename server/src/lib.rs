//! Gatekeeper Server
//!
//! Entitlement ledger and access-control backend for community guilds:
//! verification-gated single-use code redemption plus reversible soft-bans
//! that snapshot and restore member grants.

pub mod api;
pub mod audit;
pub mod codes;
pub mod config;
pub mod directory;
pub mod ledger;
pub mod moderation;
pub mod verify;
