//! Simulated depth device.
//!
//! Frames (all rigid):
//!
//! ```text
//! StartOfService ──(trajectory)──► Device ──(fixed)──► CameraDepth ──(2 cm right)──► CameraColor
//! ```
//!
//! The device body is X forward, Y left, Z up; the cameras look along the
//! body X axis with X right, Y down. `AreaDescription` coincides with
//! `StartOfService` (no drift to correct).

use std::time::Duration;

use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};
use parking_lot::Mutex;

use super::config::SimulationConfig;
use super::noise::NoiseGenerator;
use super::room::Room;
use crate::core::types::{CoordinateFrame, PointCloudSnapshot, PoseSample};
use crate::error::{Error, Result};
use crate::sensors::PoseEstimator;

/// Keep the trajectory this far from any wall (meters)
const WALL_MARGIN: f64 = 0.3;

/// Color camera origin in the depth frame (meters)
const COLOR_OFFSET: [f64; 3] = [0.02, 0.0, 0.0];

/// Simulated depth camera + pose source moving through a box room.
#[derive(Debug)]
pub struct SimulatedDevice {
    config: SimulationConfig,
    room: Room,
    device_t_depth: Isometry3<f64>,
    depth_t_color: Isometry3<f64>,
    noise: Mutex<NoiseGenerator>,
}

impl SimulatedDevice {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate().map_err(Error::InvalidParameter)?;

        let [width, depth] = config.room_size;
        let room = Room::new(width, depth, config.ceiling_height);

        // Columns: depth X (right), Y (down), Z (forward) in body coordinates.
        let axes = Matrix3::from_columns(&[
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(1.0, 0.0, 0.0),
        ]);
        let device_t_depth = Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(axes)),
        );
        let depth_t_color =
            Isometry3::translation(COLOR_OFFSET[0], COLOR_OFFSET[1], COLOR_OFFSET[2]);

        Ok(Self {
            noise: Mutex::new(NoiseGenerator::new(config.seed)),
            config,
            room,
            device_t_depth,
            depth_t_color,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Interval between point clouds.
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.config.frame_rate_hz)
    }

    /// True once pose tracking has warmed up.
    pub fn is_tracking(&self, timestamp: f64) -> bool {
        timestamp >= self.config.tracking_warmup_s
    }

    /// Device body pose in the world at `timestamp`.
    pub fn world_t_device(&self, timestamp: f64) -> Isometry3<f64> {
        let [x0, y0] = self.config.start_position;
        let [vx, vy] = self.config.velocity;
        let position = self.room.clamp(
            &Point3::new(
                x0 + vx * timestamp,
                y0 + vy * timestamp,
                self.config.device_height,
            ),
            WALL_MARGIN,
        );
        let yaw = self.config.start_yaw + self.config.yaw_rate * timestamp;
        Isometry3::from_parts(
            Translation3::from(position.coords),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw),
        )
    }

    fn world_t(&self, frame: CoordinateFrame, timestamp: f64) -> Isometry3<f64> {
        match frame {
            CoordinateFrame::StartOfService | CoordinateFrame::AreaDescription => {
                Isometry3::identity()
            }
            CoordinateFrame::Device => self.world_t_device(timestamp),
            CoordinateFrame::CameraDepth => self.world_t_device(timestamp) * self.device_t_depth,
            CoordinateFrame::CameraColor => {
                self.world_t_device(timestamp) * self.device_t_depth * self.depth_t_color
            }
        }
    }

    /// Depth-frame point cloud at `timestamp`.
    ///
    /// One ray per depth pixel through a pinhole model; returns beyond
    /// `max_range` and simulated misses are dropped. The 4th component of
    /// each point is a confidence of 1.0.
    pub fn capture(&self, timestamp: f64) -> PointCloudSnapshot {
        let world_t_depth = self.world_t(CoordinateFrame::CameraDepth, timestamp);
        let origin = world_t_depth.translation.vector.into();
        let [cols, rows] = self.config.image_size;
        let half_w = (self.config.horizontal_fov_deg.to_radians() / 2.0).tan();
        let half_h = (self.config.vertical_fov_deg.to_radians() / 2.0).tan();

        let mut noise = self.noise.lock();
        let mut points = Vec::with_capacity(cols * rows);

        for row in 0..rows {
            let y = ((row as f64 + 0.5) / rows as f64 - 0.5) * 2.0 * half_h;
            for col in 0..cols {
                let x = ((col as f64 + 0.5) / cols as f64 - 0.5) * 2.0 * half_w;
                let ray = Vector3::new(x, y, 1.0);

                let Some(t) = self.room.ray_cast(&origin, &(world_t_depth.rotation * ray)) else {
                    continue;
                };
                let range = t * ray.norm();
                if range > self.config.max_range || noise.chance(self.config.miss_rate) {
                    continue;
                }

                let noisy = (range + noise.gaussian(self.config.range_noise_stddev)) / range;
                let p = ray * (t * noisy);
                points.push([p.x as f32, p.y as f32, p.z as f32, 1.0]);
            }
        }

        PointCloudSnapshot::new(points, timestamp, CoordinateFrame::CameraDepth)
    }
}

impl PoseEstimator for SimulatedDevice {
    fn query_pose(
        &self,
        timestamp: f64,
        base: CoordinateFrame,
        target: CoordinateFrame,
    ) -> PoseSample {
        if !self.is_tracking(timestamp) {
            return PoseSample::invalid(timestamp);
        }
        let base_t_target =
            self.world_t(base, timestamp).inverse() * self.world_t(target, timestamp);
        PoseSample::from_isometry(timestamp, &base_t_target)
    }
}
