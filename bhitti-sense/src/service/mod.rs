//! Threaded wall-sensing service.
//!
//! ```text
//!  depth source ──on_point_cloud──► PointCloudCache ──► tracking thread ──► DistanceSink
//!                       │                                    ▲    │
//!                       └────── wake (bounded 1) ────────────┘    └──► SharedStatusHandle
//! ```
//!
//! [`WallSensingService::disconnect`] stops the tracking thread and blocks
//! until any in-flight cycle has completed.

mod feed;
mod tracking_thread;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;
use log::{error, info};

pub use feed::PointCloudFeed;
pub use tracking_thread::ServiceCommand;

use crate::config::BhittiConfig;
use crate::core::types::DisplayRotation;
use crate::engine::{DistanceSink, TrackerConfig, WallSensingEngine};
use crate::error::{Error, Result};
use crate::sensors::{PlaneFitter, PointCloudCache, PoseEstimator};
use crate::state::{SharedStatusHandle, create_shared_status};
use tracking_thread::TrackingContext;

const THREAD_NAME: &str = "wall-tracking";

/// Settings for [`WallSensingService::connect`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOptions {
    pub tracker: TrackerConfig,
    pub display_rotation: DisplayRotation,
    /// How long the tracking thread waits before re-checking for shutdown.
    pub idle_poll: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self::from_config(&BhittiConfig::default())
    }
}

impl ServiceOptions {
    pub fn from_config(config: &BhittiConfig) -> Self {
        Self {
            tracker: config.tracker.clone(),
            display_rotation: config.service.display_rotation,
            idle_poll: Duration::from_millis(config.service.idle_poll_ms),
        }
    }
}

/// A connected tracking session.
pub struct WallSensingService {
    feed: PointCloudFeed,
    status: SharedStatusHandle,
    commands: Sender<ServiceCommand>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl WallSensingService {
    /// Start the tracking thread.
    pub fn connect(
        options: ServiceOptions,
        estimator: Arc<dyn PoseEstimator>,
        fitter: Box<dyn PlaneFitter>,
        sink: Box<dyn DistanceSink>,
    ) -> Result<Self> {
        let grid_size = options.tracker.grid_size();
        let engine =
            WallSensingEngine::new(options.tracker)?.with_rotation(options.display_rotation);

        let cache = Arc::new(PointCloudCache::new());
        let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);
        let (command_tx, command_rx) = crossbeam_channel::unbounded();
        let status = create_shared_status();
        let running = Arc::new(AtomicBool::new(true));
        status.write().running = true;

        let context = TrackingContext {
            engine,
            cache: Arc::clone(&cache),
            estimator,
            fitter,
            sink,
            status: Arc::clone(&status),
            idle_poll: options.idle_poll,
        };
        let thread_running = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || context.run(wake_rx, command_rx, thread_running))
            .map_err(|source| Error::ThreadSpawn {
                name: THREAD_NAME,
                source,
            })?;

        info!("Wall sensing connected ({} samples per cycle)", grid_size);

        Ok(Self {
            feed: PointCloudFeed::new(cache, wake_tx),
            status,
            commands: command_tx,
            running,
            handle: Some(handle),
        })
    }

    /// Handle for the depth source.
    pub fn feed(&self) -> PointCloudFeed {
        self.feed.clone()
    }

    /// Shared tracking status.
    pub fn status(&self) -> SharedStatusHandle {
        Arc::clone(&self.status)
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// Change the display rotation from the next cycle on.
    pub fn set_display_rotation(&self, rotation: DisplayRotation) -> Result<()> {
        self.send(ServiceCommand::SetDisplayRotation(rotation))
    }

    /// Forget the tracked wall.
    pub fn reset_wall(&self) -> Result<()> {
        self.send(ServiceCommand::ResetWall)
    }

    fn send(&self, command: ServiceCommand) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::Disconnected);
        }
        self.commands.send(command).map_err(|_| Error::Disconnected)
    }

    /// Stop the tracking thread and wait for it.
    ///
    /// Blocks until any in-flight cycle has completed. Idempotent.
    pub fn disconnect(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.running.store(false, Ordering::Relaxed);
        if handle.join().is_err() {
            error!("Tracking thread panicked");
        }
        self.status.write().running = false;
        info!("Wall sensing disconnected");
    }
}

impl Drop for WallSensingService {
    fn drop(&mut self) {
        self.disconnect();
    }
}
