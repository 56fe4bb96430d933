//! Default value functions for serde deserialization.

pub fn idle_poll_ms() -> u64 {
    100
}

pub fn frame_rate_hz() -> f64 {
    5.0
}

pub fn room_size() -> [f64; 2] {
    [6.0, 4.0]
}

pub fn ceiling_height() -> f64 {
    2.6
}

pub fn device_height() -> f64 {
    1.4
}

pub fn start_position() -> [f64; 2] {
    [0.0, 0.0]
}

pub fn velocity() -> [f64; 2] {
    [0.1, 0.0]
}

pub fn yaw_rate() -> f64 {
    0.05
}

pub fn image_size() -> [usize; 2] {
    [64, 48]
}

pub fn horizontal_fov_deg() -> f64 {
    60.0
}

pub fn vertical_fov_deg() -> f64 {
    45.0
}

pub fn max_range() -> f64 {
    4.0
}

pub fn range_noise_stddev() -> f64 {
    0.0
}

pub fn seed() -> u64 {
    42
}
