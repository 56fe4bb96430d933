//! Sensor-side entry point.

use std::sync::Arc;

use crossbeam_channel::{Sender, TrySendError};
use log::trace;

use crate::core::types::PointCloudSnapshot;
use crate::sensors::PointCloudCache;

/// Handle given to the depth source.
///
/// `on_point_cloud` never blocks: the snapshot overwrites the cache and a
/// wake token is offered to the tracking thread. If a token is already
/// pending, the cycle it triggers will pick up this snapshot instead.
#[derive(Debug, Clone)]
pub struct PointCloudFeed {
    cache: Arc<PointCloudCache>,
    wake: Sender<()>,
}

impl PointCloudFeed {
    pub(crate) fn new(cache: Arc<PointCloudCache>, wake: Sender<()>) -> Self {
        Self { cache, wake }
    }

    /// Deliver a new point cloud. Returns its sequence number.
    pub fn on_point_cloud(&self, snapshot: PointCloudSnapshot) -> u64 {
        let sequence = self.cache.update(snapshot);
        match self.wake.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => trace!("Cloud {} coalesced", sequence),
            Err(TrySendError::Disconnected(())) => trace!("Cloud {} after disconnect", sequence),
        }
        sequence
    }

    /// The cache behind this feed.
    pub fn cache(&self) -> &PointCloudCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CoordinateFrame;

    fn cloud(timestamp: f64) -> PointCloudSnapshot {
        PointCloudSnapshot::new(
            vec![[0.0, 0.0, 1.0, 1.0]],
            timestamp,
            CoordinateFrame::CameraDepth,
        )
    }

    #[test]
    fn test_wake_tokens_coalesce() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let feed = PointCloudFeed::new(Arc::new(PointCloudCache::new()), tx);

        assert_eq!(feed.on_point_cloud(cloud(1.0)), 1);
        assert_eq!(feed.on_point_cloud(cloud(2.0)), 2);
        assert_eq!(feed.on_point_cloud(cloud(3.0)), 3);

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
        assert_eq!(feed.cache().latest().timestamp, 3.0);
    }

    #[test]
    fn test_feed_survives_receiver_drop() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        let feed = PointCloudFeed::new(Arc::new(PointCloudCache::new()), tx);
        assert_eq!(feed.on_point_cloud(cloud(1.0)), 1);
    }
}
