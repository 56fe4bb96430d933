//! Core types and geometry shared by every layer.
//!
//! - [`types`]: point clouds, plane models, pose samples, frame identifiers
//! - [`math`]: moving plane equations between frames, placement matrices

pub mod math;
pub mod types;
