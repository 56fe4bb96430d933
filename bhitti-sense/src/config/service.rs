//! Service configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::core::types::DisplayRotation;

/// Threading and host-facing settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceSection {
    /// Screen rotation applied to grid coordinates (0, 90, 180 or 270)
    #[serde(default)]
    pub display_rotation: DisplayRotation,

    /// How often the tracking thread checks for shutdown while idle (ms)
    #[serde(default = "defaults::idle_poll_ms")]
    pub idle_poll_ms: u64,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            display_rotation: DisplayRotation::default(),
            idle_poll_ms: defaults::idle_poll_ms(),
        }
    }
}

impl ServiceSection {
    pub fn validate(&self) -> Result<(), String> {
        if self.idle_poll_ms == 0 {
            return Err("idle_poll_ms must be positive".to_string());
        }
        Ok(())
    }
}
