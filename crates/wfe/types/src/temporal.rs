use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Hybrid timestamp for marks: wall-clock milliseconds plus a logical
/// counter that orders marks recorded within the same millisecond.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemporalAnchor {
    /// Physical time component (milliseconds since Unix epoch)
    pub physical_ms: u64,
    /// Logical counter for marks at the same physical time
    pub logical: u32,
}

impl TemporalAnchor {
    pub fn new(physical_ms: u64, logical: u32) -> Self {
        Self {
            physical_ms,
            logical,
        }
    }

    /// Zero anchor (before all marks).
    pub fn genesis() -> Self {
        Self::new(0, 0)
    }

    /// Does `self` happen strictly before `other`?
    pub fn precedes(&self, other: &TemporalAnchor) -> bool {
        self < other
    }
}

impl PartialOrd for TemporalAnchor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TemporalAnchor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.physical_ms
            .cmp(&other.physical_ms)
            .then(self.logical.cmp(&other.logical))
    }
}

/// Source of physical time for mark timestamps.
///
/// Injected so that law tests and fusion runs stay deterministic under a
/// [`FixedClock`], while production callers use [`SystemClock`].
pub trait MarkClock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl MarkClock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// A clock frozen at a single instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl MarkClock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}
