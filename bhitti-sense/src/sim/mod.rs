//! Simulated depth device.
//!
//! Stands in for real hardware: a device moves through a box room and
//! delivers depth-frame point clouds, while answering pose queries exactly.
//! Used by the daemon, the benchmarks and the integration tests.

mod config;
mod device;
mod noise;
mod room;

pub use config::SimulationConfig;
pub use device::SimulatedDevice;
pub use noise::NoiseGenerator;
pub use room::Room;
