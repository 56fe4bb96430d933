//! Most-recent-wins point-cloud slot.
//!
//! The sensor callback writes, the update cycle reads. Snapshots are shared
//! as `Arc`s, so a write is a pointer swap under the lock and a reader always
//! gets one whole snapshot: the previous one or the new one.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::types::PointCloudSnapshot;

#[derive(Debug, Default)]
struct Slot {
    snapshot: Option<Arc<PointCloudSnapshot>>,
    /// Bumped on every update; 0 means "never written".
    sequence: u64,
}

/// Single-slot point-cloud cache.
#[derive(Debug, Default)]
pub struct PointCloudCache {
    slot: Mutex<Slot>,
}

impl PointCloudCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored snapshot unconditionally.
    ///
    /// Returns the new sequence number.
    pub fn update(&self, snapshot: PointCloudSnapshot) -> u64 {
        let snapshot = Arc::new(snapshot);
        let mut slot = self.slot.lock();
        slot.snapshot = Some(snapshot);
        slot.sequence += 1;
        slot.sequence
    }

    /// Latest snapshot, or an empty one if nothing has arrived yet.
    pub fn latest(&self) -> Arc<PointCloudSnapshot> {
        self.latest_with_sequence().1
    }

    /// Latest snapshot together with its sequence number.
    pub fn latest_with_sequence(&self) -> (u64, Arc<PointCloudSnapshot>) {
        let slot = self.slot.lock();
        match &slot.snapshot {
            Some(snapshot) => (slot.sequence, Arc::clone(snapshot)),
            None => (0, Arc::new(PointCloudSnapshot::empty())),
        }
    }

    /// Number of updates so far.
    pub fn sequence(&self) -> u64 {
        self.slot.lock().sequence
    }
}
