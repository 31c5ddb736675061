use serde::{Deserialize, Serialize};

use crate::util::easing::EasingFunction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance; pushed out further when the orbit
    /// distance and structure size need it.
    pub zfar: f32,
    /// Radians of rotation per pixel of drag.
    pub rotate_speed: f32,
    /// Pan displacement per pixel, as a fraction of the orbit distance.
    pub pan_speed: f32,
    /// Distance multiplier applied per zoom-out step (reciprocal for zoom-in).
    pub zoom_factor: f32,
    /// Closest allowed orbit distance.
    pub min_distance: f32,
    /// Farthest allowed orbit distance.
    pub max_distance: f32,
    /// Per-frame velocity multiplier while coasting after a pan.
    pub momentum_decay: f32,
    /// Per-axis speed below which coasting stops.
    pub momentum_threshold: f32,
    /// Duration of the recentre animation after a pick, in milliseconds.
    pub focus_duration_ms: u64,
    /// Curve used by the recentre animation.
    pub focus_easing: EasingFunction,
    /// Orbit distance per unit of molecule extent after a reset.
    pub reset_distance_factor: f32,
    /// Orbit distance used when resetting without a loaded structure.
    pub default_distance: f32,
    /// Pixel-equivalent drag applied per arrow-key press.
    pub arrow_pan_step: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 0.1,
            zfar: 1000.0,
            rotate_speed: 0.01,
            pan_speed: 0.002,
            zoom_factor: 1.1,
            min_distance: 1.0,
            max_distance: 1000.0,
            momentum_decay: 0.9,
            momentum_threshold: 1e-3,
            focus_duration_ms: 500,
            focus_easing: EasingFunction::CubicInOut,
            reset_distance_factor: 2.0,
            default_distance: 50.0,
            arrow_pan_step: 20.0,
        }
    }
}

impl CameraOptions {
    /// Clamp `distance` into the configured orbit range.
    #[must_use]
    pub fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance.max(self.min_distance))
    }
}
