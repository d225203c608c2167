//! Item identity for the canvas arena.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a canvas item, allocated at construction and never
/// reused within a process. Copy, Eq, Hash are all O(1).
///
/// The decimal rendering doubles as the per-node identifier written into
/// save files. Those persisted identifiers are only meaningful within one
/// save/load round-trip; loading always allocates fresh ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    /// Allocate the next unused id.
    pub fn fresh() -> Self {
        ItemId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}
