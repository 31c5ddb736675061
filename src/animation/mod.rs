//! Frame-paced animation scheduling.

pub mod task;

pub use task::{FrameTask, TaskStatus};
