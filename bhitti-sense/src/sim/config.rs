//! Simulated device configuration.
//!
//! | Parameter | Default | |
//! |-----------|---------|---|
//! | room_size | 6 × 4 m | walls at x = ±3, y = ±2 |
//! | ceiling_height | 2.6 m | |
//! | device_height | 1.4 m | handheld |
//! | velocity | (0.1, 0) m/s | toward the +x wall |
//! | image_size | 64 × 48 | depth pixels |
//! | fov | 60° × 45° | matches the default fitter intrinsics |
//! | range_noise_stddev | 0 | inliers use a 1 mm tolerance |

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// Simulated room, trajectory and depth camera
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Room extent along world x and y (meters)
    #[serde(default = "defaults::room_size")]
    pub room_size: [f64; 2],

    /// Ceiling height (meters)
    #[serde(default = "defaults::ceiling_height")]
    pub ceiling_height: f64,

    /// Height of the device above the floor (meters)
    #[serde(default = "defaults::device_height")]
    pub device_height: f64,

    /// Device position at t = 0 (world x, y)
    #[serde(default = "defaults::start_position")]
    pub start_position: [f64; 2],

    /// Device heading at t = 0 (radians, 0 = +x)
    #[serde(default)]
    pub start_yaw: f64,

    /// World-frame velocity (m/s)
    #[serde(default = "defaults::velocity")]
    pub velocity: [f64; 2],

    /// Heading rate (rad/s)
    #[serde(default = "defaults::yaw_rate")]
    pub yaw_rate: f64,

    /// Depth image columns × rows
    #[serde(default = "defaults::image_size")]
    pub image_size: [usize; 2],

    /// Horizontal field of view (degrees)
    #[serde(default = "defaults::horizontal_fov_deg")]
    pub horizontal_fov_deg: f64,

    /// Vertical field of view (degrees)
    #[serde(default = "defaults::vertical_fov_deg")]
    pub vertical_fov_deg: f64,

    /// Returns beyond this range are dropped (meters)
    #[serde(default = "defaults::max_range")]
    pub max_range: f64,

    /// Gaussian range noise (meters)
    #[serde(default = "defaults::range_noise_stddev")]
    pub range_noise_stddev: f64,

    /// Probability that a pixel has no return
    #[serde(default)]
    pub miss_rate: f64,

    /// Poses are invalid before this time (seconds)
    #[serde(default)]
    pub tracking_warmup_s: f64,

    /// Random seed (0 = entropy)
    #[serde(default = "defaults::seed")]
    pub seed: u64,

    /// Point-cloud delivery rate (Hz)
    #[serde(default = "defaults::frame_rate_hz")]
    pub frame_rate_hz: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            room_size: defaults::room_size(),
            ceiling_height: defaults::ceiling_height(),
            device_height: defaults::device_height(),
            start_position: defaults::start_position(),
            start_yaw: 0.0,
            velocity: defaults::velocity(),
            yaw_rate: defaults::yaw_rate(),
            image_size: defaults::image_size(),
            horizontal_fov_deg: defaults::horizontal_fov_deg(),
            vertical_fov_deg: defaults::vertical_fov_deg(),
            max_range: defaults::max_range(),
            range_noise_stddev: defaults::range_noise_stddev(),
            miss_rate: 0.0,
            tracking_warmup_s: 0.0,
            seed: defaults::seed(),
            frame_rate_hz: defaults::frame_rate_hz(),
        }
    }
}

impl SimulationConfig {
    /// A device standing still, facing +x.
    pub fn stationary() -> Self {
        Self {
            velocity: [0.0, 0.0],
            yaw_rate: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let [width, depth] = self.room_size;
        if [width, depth, self.ceiling_height]
            .iter()
            .any(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err("room dimensions must be positive".to_string());
        }
        if self.device_height.is_nan()
            || self.device_height <= 0.0
            || self.device_height >= self.ceiling_height
        {
            return Err(format!(
                "device_height {} must be between floor and ceiling",
                self.device_height
            ));
        }
        let [x, y] = self.start_position;
        if x.abs() >= width / 2.0 || y.abs() >= depth / 2.0 {
            return Err(format!("start position ({}, {}) is outside the room", x, y));
        }
        if self.image_size[0] == 0 || self.image_size[1] == 0 {
            return Err("image_size must be non-zero".to_string());
        }
        for fov in [self.horizontal_fov_deg, self.vertical_fov_deg] {
            if fov.is_nan() || fov <= 0.0 || fov >= 180.0 {
                return Err(format!("field of view {} must be in (0, 180)", fov));
            }
        }
        if self.max_range.is_nan()
            || self.max_range <= 0.0
            || !self.frame_rate_hz.is_finite()
            || self.frame_rate_hz <= 0.0
        {
            return Err("max_range and frame_rate_hz must be positive".to_string());
        }
        if self.range_noise_stddev.is_nan()
            || self.range_noise_stddev < 0.0
            || !(0.0..=1.0).contains(&self.miss_rate)
        {
            return Err("noise parameters out of range".to_string());
        }
        Ok(())
    }
}
