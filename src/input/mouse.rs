use glam::Vec2;
use web_time::{Duration, Instant};

const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(400);

/// Maximum pointer travel between the two clicks of a double-click.
const DOUBLE_CLICK_SLOP: f32 = 5.0;

/// Squared per-event movement above which a press becomes a drag.
const DRAG_THRESHOLD_SQ: f32 = 1.0;

/// Result of processing a mouse-up through the click state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickResult {
    /// Drag release or a cancelled press.
    NoAction,
    /// First click of a potential double-click.
    SingleClick,
    /// Second click within the threshold, at the given position.
    DoubleClick {
        /// Pointer position of the second click.
        position: Vec2,
    },
}

/// Tracks pointer position, drag state and click timing.
#[derive(Debug, Clone)]
pub struct InputState {
    pub mouse_pos: Vec2,
    pub is_dragging: bool,
    pressed: bool,
    last_click: Option<(Instant, Vec2)>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            mouse_pos: Vec2::ZERO,
            is_dragging: false,
            pressed: false,
            last_click: None,
        }
    }

    /// Start a press at the current position.
    pub fn handle_mouse_down(&mut self) {
        self.pressed = true;
        self.is_dragging = false;
    }

    /// Update the cursor position and return the movement delta.
    ///
    /// Movement while pressed beyond a small threshold turns the press
    /// into a drag.
    pub fn handle_mouse_position(&mut self, x: f32, y: f32) -> Vec2 {
        let pos = Vec2::new(x, y);
        let delta = pos - self.mouse_pos;
        self.mouse_pos = pos;
        if self.pressed && delta.length_squared() > DRAG_THRESHOLD_SQ {
            self.is_dragging = true;
        }
        delta
    }

    /// Abandon the current press (pointer left the window).
    pub fn cancel(&mut self) {
        self.pressed = false;
        self.is_dragging = false;
        self.last_click = None;
    }

    /// Process a mouse-up and classify the click.
    pub fn process_mouse_up(&mut self, now: Instant) -> ClickResult {
        let was_pressed = std::mem::replace(&mut self.pressed, false);
        let was_dragging = std::mem::replace(&mut self.is_dragging, false);

        if !was_pressed || was_dragging {
            self.last_click = None;
            return ClickResult::NoAction;
        }

        let position = self.mouse_pos;
        let is_double = self.last_click.is_some_and(|(time, pos)| {
            now.saturating_duration_since(time) < DOUBLE_CLICK_THRESHOLD
                && pos.distance(position) <= DOUBLE_CLICK_SLOP
        });

        if is_double {
            self.last_click = None;
            ClickResult::DoubleClick { position }
        } else {
            self.last_click = Some((now, position));
            ClickResult::SingleClick
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(state: &mut InputState, now: Instant) -> ClickResult {
        state.handle_mouse_down();
        state.process_mouse_up(now)
    }

    #[test]
    fn two_quick_clicks_are_a_double_click() {
        let mut state = InputState::new();
        let _ = state.handle_mouse_position(10.0, 20.0);
        let t0 = Instant::now();
        assert_eq!(click(&mut state, t0), ClickResult::SingleClick);
        assert_eq!(
            click(&mut state, t0 + Duration::from_millis(200)),
            ClickResult::DoubleClick {
                position: Vec2::new(10.0, 20.0)
            }
        );
        // A third click starts a new sequence.
        assert_eq!(
            click(&mut state, t0 + Duration::from_millis(300)),
            ClickResult::SingleClick
        );
    }

    #[test]
    fn slow_clicks_are_singles() {
        let mut state = InputState::new();
        let t0 = Instant::now();
        assert_eq!(click(&mut state, t0), ClickResult::SingleClick);
        assert_eq!(
            click(&mut state, t0 + Duration::from_millis(450)),
            ClickResult::SingleClick
        );
    }

    #[test]
    fn drag_release_is_no_action() {
        let mut state = InputState::new();
        let t0 = Instant::now();
        assert_eq!(click(&mut state, t0), ClickResult::SingleClick);
        state.handle_mouse_down();
        let _ = state.handle_mouse_position(30.0, 0.0);
        assert!(state.is_dragging);
        assert_eq!(
            state.process_mouse_up(t0 + Duration::from_millis(100)),
            ClickResult::NoAction
        );
    }

    #[test]
    fn distant_second_click_is_single() {
        let mut state = InputState::new();
        let t0 = Instant::now();
        assert_eq!(click(&mut state, t0), ClickResult::SingleClick);
        // Move without pressing, then click elsewhere.
        let _ = state.handle_mouse_position(100.0, 100.0);
        assert_eq!(
            click(&mut state, t0 + Duration::from_millis(100)),
            ClickResult::SingleClick
        );
    }

    #[test]
    fn release_without_press_is_no_action() {
        let mut state = InputState::new();
        assert_eq!(state.process_mouse_up(Instant::now()), ClickResult::NoAction);
    }
}
