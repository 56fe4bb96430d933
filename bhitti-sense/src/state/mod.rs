//! State shared between the tracking thread and the host.
//!
//! - `SharedStatusHandle`: tracked wall, last measurement and counters,
//!   written by the tracking thread after every cycle

mod shared;

pub use shared::{SharedStatusHandle, TrackingStatus, create_shared_status};
