//! Tracking thread - one update cycle per delivered point cloud.
//!
//! This thread:
//! - Waits on the wake channel (or the command channel) with `select!`
//! - Runs one full cycle on the latest cached cloud, never two at once
//! - Writes the cycle into the shared status
//!
//! Clouds that arrive during a cycle are coalesced: the next cycle sees only
//! the newest one. A wake with no new cloud (same sequence) is ignored.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, select};
use log::{debug, info};

use crate::core::types::DisplayRotation;
use crate::engine::{DistanceSink, WallSensingEngine};
use crate::sensors::{PlaneFitter, PointCloudCache, PoseEstimator};
use crate::state::SharedStatusHandle;

/// Commands accepted by the tracking thread between cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServiceCommand {
    /// Change the display rotation for subsequent cycles.
    SetDisplayRotation(DisplayRotation),
    /// Forget the tracked wall.
    ResetWall,
}

enum Event {
    Wake,
    Command(ServiceCommand),
    Idle,
    Closed,
}

/// Everything the tracking loop owns.
pub(crate) struct TrackingContext {
    pub engine: WallSensingEngine,
    pub cache: Arc<PointCloudCache>,
    pub estimator: Arc<dyn PoseEstimator>,
    pub fitter: Box<dyn PlaneFitter>,
    pub sink: Box<dyn DistanceSink>,
    pub status: SharedStatusHandle,
    pub idle_poll: Duration,
}

impl TrackingContext {
    /// Run until `running` is cleared or every feed is gone.
    pub fn run(
        mut self,
        wake_rx: Receiver<()>,
        command_rx: Receiver<ServiceCommand>,
        running: Arc<AtomicBool>,
    ) {
        info!("Tracking thread starting");
        let mut last_sequence = 0;

        while running.load(Ordering::Relaxed) {
            let event = select! {
                recv(wake_rx) -> msg => match msg {
                    Ok(()) => Event::Wake,
                    Err(_) => Event::Closed,
                },
                recv(command_rx) -> msg => msg.map_or(Event::Idle, Event::Command),
                // Timeout to allow checking running flag
                default(self.idle_poll) => Event::Idle,
            };

            match event {
                Event::Wake => {}
                Event::Command(command) => {
                    self.apply(command);
                    continue;
                }
                Event::Idle => continue,
                Event::Closed => {
                    debug!("All point-cloud feeds dropped");
                    break;
                }
            }

            // Commands sent before this cloud apply to its cycle.
            while let Ok(command) = command_rx.try_recv() {
                self.apply(command);
            }

            let (sequence, cloud) = self.cache.latest_with_sequence();
            if sequence == last_sequence {
                continue;
            }
            last_sequence = sequence;

            let report = self.engine.run_cycle(
                &cloud,
                self.estimator.as_ref(),
                self.fitter.as_ref(),
                self.sink.as_mut(),
            );
            self.status
                .write()
                .record(&report, self.engine.tracked_wall());
        }

        info!("Tracking thread stopped");
    }

    fn apply(&mut self, command: ServiceCommand) {
        debug!("Command: {:?}", command);
        match command {
            ServiceCommand::SetDisplayRotation(rotation) => {
                self.engine.set_display_rotation(rotation)
            }
            ServiceCommand::ResetWall => {
                self.engine.reset();
                self.status.write().tracked_wall = None;
            }
        }
    }
}
