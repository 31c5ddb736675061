//! Single-slot frame task.
//!
//! A [`FrameTask`] holds at most one in-flight animation for one animated
//! quantity. Starting a new task replaces the old one (no queueing), and a
//! task that reports [`TaskStatus::Finished`] releases the slot on the same
//! tick, so an idle slot costs nothing per frame.

/// Outcome of advancing a task by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Keep the task scheduled for the next frame.
    Running,
    /// Release the slot.
    Finished,
}

/// At most one active task of type `T`.
#[derive(Debug, Clone)]
pub struct FrameTask<T> {
    active: Option<T>,
}

impl<T> Default for FrameTask<T> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<T> FrameTask<T> {
    /// Empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task`, cancelling any task already in the slot.
    ///
    /// Returns `true` if an in-flight task was replaced.
    pub fn start(&mut self, task: T) -> bool {
        self.active.replace(task).is_some()
    }

    /// Drop the in-flight task, if any. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Whether a task currently occupies the slot.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Borrow the in-flight task.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.active.as_ref()
    }

    /// Advance the in-flight task by one frame.
    ///
    /// Returns `false` without calling `step` when the slot is empty.
    pub fn tick(&mut self, step: impl FnOnce(&mut T) -> TaskStatus) -> bool {
        let Some(task) = self.active.as_mut() else {
            return false;
        };
        if step(task) == TaskStatus::Finished {
            self.active = None;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_does_not_step() {
        let mut slot: FrameTask<u32> = FrameTask::new();
        let mut called = false;
        assert!(!slot.tick(|_| {
            called = true;
            TaskStatus::Running
        }));
        assert!(!called);
    }

    #[test]
    fn start_replaces_in_flight_task() {
        let mut slot = FrameTask::new();
        assert!(!slot.start(1));
        assert!(slot.start(2));
        assert_eq!(slot.get(), Some(&2));
    }

    #[test]
    fn finished_task_releases_slot() {
        let mut slot = FrameTask::new();
        let _ = slot.start(3u32);
        let mut ticks = 0;
        while slot.tick(|n| {
            *n -= 1;
            if *n == 0 {
                TaskStatus::Finished
            } else {
                TaskStatus::Running
            }
        }) {
            ticks += 1;
        }
        assert_eq!(ticks, 3);
        assert!(!slot.is_active());
    }

    #[test]
    fn cancel_reports_previous_state() {
        let mut slot = FrameTask::new();
        assert!(!slot.cancel());
        let _ = slot.start(());
        assert!(slot.cancel());
        assert!(!slot.is_active());
    }
}
