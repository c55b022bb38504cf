//! Spell resolution constants. Per-spell numbers live in the spell catalog.

/// Maximum targets a chain spell can hit
pub const CHAIN_MAX_HOPS: usize = 3;
