//! Tracker configuration.
//!
//! All grid constants and thresholds of one update cycle live here. Two
//! presets mirror the two ways the engine is driven:
//!
//! | Preset | Grid | Verticality |
//! |--------|------|-------------|
//! | [`TrackerConfig::service`] (default) | 7×7 `{0.5, 0.4, 0.6, 0.2, 0.8, 0.0, 1.0}` | 0.05 |
//! | [`TrackerConfig::interactive`] | 5×5 `{0.5, 0.4, 0.6, 0.2, 0.8}` | 0.04 |

use serde::{Deserialize, Serialize};

use crate::algorithms::{GridSampler, WallSelector};

const SERVICE_GRID: [f64; 7] = [0.5, 0.4, 0.6, 0.2, 0.8, 0.0, 1.0];
const INTERACTIVE_GRID: [f64; 5] = [0.5, 0.4, 0.6, 0.2, 0.8];

fn default_grid() -> Vec<f64> {
    SERVICE_GRID.to_vec()
}

fn default_verticality_threshold() -> f64 {
    0.05
}

fn default_inlier_epsilon() -> f64 {
    0.001
}

fn default_abc_match_threshold() -> f64 {
    0.75
}

fn default_d_match_threshold() -> f64 {
    0.2
}

fn default_min_inliers() -> usize {
    1
}

/// Which coefficient the identity test compares against `d_match_threshold`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetCheck {
    /// Compare `c` a second time (observed behavior: the offset is never
    /// compared).
    #[default]
    CoefficientC,
    /// Compare the offset `d`.
    OffsetD,
}

/// Parameters of one update cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Horizontal grid coordinates, scanned as the outer loop.
    #[serde(default = "default_grid")]
    pub grid_u: Vec<f64>,

    /// Vertical grid coordinates, scanned as the inner loop.
    #[serde(default = "default_grid")]
    pub grid_v: Vec<f64>,

    /// Maximum `|c|` of a world-frame plane for it to count as a wall.
    #[serde(default = "default_verticality_threshold")]
    pub verticality_threshold: f64,

    /// Inlier tolerance on the raw plane equation (sensor units).
    #[serde(default = "default_inlier_epsilon")]
    pub inlier_epsilon: f64,

    /// Per-coefficient tolerance on `a`, `b`, `c` for "same wall".
    #[serde(default = "default_abc_match_threshold")]
    pub abc_match_threshold: f64,

    /// Tolerance for the offset check.
    #[serde(default = "default_d_match_threshold")]
    pub d_match_threshold: f64,

    /// Coefficient the offset check looks at.
    #[serde(default)]
    pub offset_check: OffsetCheck,

    /// Minimum inlier support for a candidate to be selected.
    #[serde(default = "default_min_inliers")]
    pub min_inliers: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::service()
    }
}

impl TrackerConfig {
    /// Background-service preset: 7×7 grid, verticality 0.05.
    pub fn service() -> Self {
        Self {
            grid_u: default_grid(),
            grid_v: default_grid(),
            verticality_threshold: default_verticality_threshold(),
            inlier_epsilon: default_inlier_epsilon(),
            abc_match_threshold: default_abc_match_threshold(),
            d_match_threshold: default_d_match_threshold(),
            offset_check: OffsetCheck::default(),
            min_inliers: default_min_inliers(),
        }
    }

    /// Interactive preset: 5×5 grid, verticality 0.04.
    pub fn interactive() -> Self {
        Self {
            grid_u: INTERACTIVE_GRID.to_vec(),
            grid_v: INTERACTIVE_GRID.to_vec(),
            verticality_threshold: 0.04,
            ..Self::service()
        }
    }

    /// Number of grid samples per cycle.
    pub fn grid_size(&self) -> usize {
        self.grid_u.len() * self.grid_v.len()
    }

    /// Check ranges.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_u.is_empty() || self.grid_v.is_empty() {
            return Err("grid_u and grid_v must not be empty".to_string());
        }
        if let Some(bad) = self
            .grid_u
            .iter()
            .chain(&self.grid_v)
            .find(|x| !(0.0..=1.0).contains(*x))
        {
            return Err(format!("grid coordinate {} is outside [0, 1]", bad));
        }
        let thresholds = [
            ("verticality_threshold", self.verticality_threshold),
            ("inlier_epsilon", self.inlier_epsilon),
            ("abc_match_threshold", self.abc_match_threshold),
            ("d_match_threshold", self.d_match_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be positive (got {})", name, value));
            }
        }
        Ok(())
    }

    /// Sampler over this grid.
    pub fn sampler(&self) -> GridSampler {
        GridSampler::new(self.grid_u.clone(), self.grid_v.clone())
    }

    /// Selector with these thresholds.
    pub fn selector(&self) -> WallSelector {
        WallSelector::new(
            self.verticality_threshold,
            self.inlier_epsilon,
            self.min_inliers,
        )
    }
}
