//! Shared utilities: easing curves for camera animation and frame timing.

pub mod easing;
pub mod frame_timing;
