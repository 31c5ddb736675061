//! Orbital camera: state, projection, and the controller that owns all
//! camera mutation (rotate, pan with momentum, zoom, reset, recentre).

/// Orbital camera controller with momentum and recentre animation.
pub mod controller;
/// Camera state, projection and GPU uniform types.
pub mod core;

pub use controller::CameraController;
pub use self::core::{CameraState, CameraUniform, Projection};
