//! Unified configuration loading for BhittiSense.
//!
//! Loads all configuration from a single TOML file with sensible defaults;
//! every field is optional.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bhitti_sense::config::BhittiConfig;
//!
//! // Load from default path (configs/bhitti-sense.toml)
//! let config = BhittiConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = BhittiConfig::default();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | `[tracker]` | Sampling grid, verticality, inlier and match thresholds |
//! | `[fitter]` | Built-in plane fit: intrinsics, search radius |
//! | `[service]` | Display rotation, idle poll interval |
//! | `[simulation]` | Simulated room, trajectory and depth camera |
//!
//! ## Example TOML
//!
//! ```toml
//! [tracker]
//! grid_u = [0.5, 0.4, 0.6, 0.2, 0.8]
//! grid_v = [0.5, 0.4, 0.6, 0.2, 0.8]
//! verticality_threshold = 0.04
//! offset_check = "coefficient_c"   # or "offset_d"
//!
//! [service]
//! display_rotation = 90
//! ```

mod bhitti;
pub(crate) mod defaults;
mod error;
mod service;

pub use bhitti::{BhittiConfig, DEFAULT_CONFIG_PATH};
pub use error::ConfigLoadError;
pub use service::ServiceSection;
