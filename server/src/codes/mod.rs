//! Code pool and allocator.
//!
//! Exactly-once FIFO assignment of single-use codes, plus the privileged
//! pool administration operations. Every mutation is a single atomic
//! document rewrite through the ledger's critical section.

mod allocator;
mod types;

pub use allocator::{
    add_codes, clear_pool, count_codes, list_codes, redeem, remove_code,
};
pub use types::{PoolTotals, RedeemOutcome};
