//! Converts raw platform events into viewer commands.
//!
//! The `InputProcessor` owns all transient input state (pointer tracking,
//! drag detection, double-click timing, modifier keys) and the key-binding
//! map. It is the only thing between raw window events and
//! [`MolecularEngine::execute`](crate::engine::MolecularEngine::execute).

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::event::{InputEvent, MouseButton};
use super::mouse::{ClickResult, InputState};
use crate::engine::ViewerCommand;

/// Maps key chords to [`ViewerCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format (`"KeyR"`,
/// `"ArrowLeft"`, `"Escape"`), optionally prefixed by modifiers in the
/// fixed order `Ctrl+`, `Alt+`, `Shift+` (e.g. `"Ctrl+Shift+KeyD"`).
///
/// Only discrete commands make sense as key bindings; parameterized
/// commands like `RotateCamera` come from pointer gestures.
///
/// Deserialized entries are layered over the defaults, so a partial table
/// only rebinds the chords it names.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KeyBindings {
    /// Forward map: key chord → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// On-disk form of [`KeyBindings`] before merging with the defaults.
#[derive(Deserialize, Default)]
#[serde(default)]
struct KeyBindingOverrides {
    bindings: HashMap<String, KeyCommandTag>,
}

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let overrides = KeyBindingOverrides::deserialize(deserializer)?;
        let mut merged = Self::default();
        merged.bindings.extend(overrides.bindings);
        Ok(merged)
    }
}

/// Serializable tag for the key-bindable subset of [`ViewerCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Recentre on the loaded structure.
    ResetCamera,
    /// Pan one step left.
    PanLeft,
    /// Pan one step right.
    PanRight,
    /// Pan one step up.
    PanUp,
    /// Pan one step down.
    PanDown,
    /// Flip between spheres and ribbon.
    ToggleMode,
    /// Toggle periodic diagnostics.
    ToggleDiagnostics,
    /// Dismiss the load error.
    DismissError,
}

impl KeyCommandTag {
    /// Convert to the corresponding [`ViewerCommand`].
    fn to_command(self) -> ViewerCommand {
        let pan = |x: f32, y: f32| ViewerCommand::PanStep {
            direction: Vec2::new(x, y),
        };
        match self {
            Self::ResetCamera => ViewerCommand::ResetCamera,
            Self::PanLeft => pan(-1.0, 0.0),
            Self::PanRight => pan(1.0, 0.0),
            Self::PanUp => pan(0.0, -1.0),
            Self::PanDown => pan(0.0, 1.0),
            Self::ToggleMode => ViewerCommand::ToggleMode,
            Self::ToggleDiagnostics => ViewerCommand::ToggleDiagnostics,
            Self::DismissError => ViewerCommand::DismissError,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyR".into(), KeyCommandTag::ResetCamera),
            ("ArrowLeft".into(), KeyCommandTag::PanLeft),
            ("ArrowRight".into(), KeyCommandTag::PanRight),
            ("ArrowUp".into(), KeyCommandTag::PanUp),
            ("ArrowDown".into(), KeyCommandTag::PanDown),
            ("KeyV".into(), KeyCommandTag::ToggleMode),
            ("Ctrl+Shift+KeyD".into(), KeyCommandTag::ToggleDiagnostics),
            ("Escape".into(), KeyCommandTag::DismissError),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a key chord string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<ViewerCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind (or rebind) a chord.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }
}

/// Held modifier keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Modifiers {
    shift: bool,
    ctrl: bool,
    alt: bool,
}

impl Modifiers {
    fn chord(self, key: &str) -> String {
        let mut chord = String::new();
        if self.ctrl {
            chord.push_str("Ctrl+");
        }
        if self.alt {
            chord.push_str("Alt+");
        }
        if self.shift {
            chord.push_str("Shift+");
        }
        chord.push_str(key);
        chord
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`ViewerCommand`]s.
///
/// - primary drag → rotate
/// - middle drag, or shift + primary drag → pan
/// - wheel → zoom
/// - double-click without a drag → pick at the cursor
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input.handle_event(event) {
///     engine.execute(cmd);
/// }
/// if let Some(cmd) = input.handle_key_press("KeyR") {
///     engine.execute(cmd);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct InputProcessor {
    /// Pointer tracking and double-click state machine.
    state: InputState,
    /// Whether the primary button is held.
    primary_pressed: bool,
    /// Whether the middle button is held.
    middle_pressed: bool,
    modifiers: Modifiers,
    /// Key chord → command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key_bindings(KeyBindings::default())
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            state: InputState::new(),
            primary_pressed: false,
            middle_pressed: false,
            modifiers: Modifiers::default(),
            key_bindings,
        }
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn mouse_pos(&self) -> Vec2 {
        self.state.mouse_pos
    }

    /// Whether any drag button is held.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.primary_pressed || self.middle_pressed
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Look up a key press, combined with the held modifiers.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<ViewerCommand> {
        self.key_bindings.lookup(&self.modifiers.chord(key))
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<ViewerCommand> {
        self.handle_event_at(event, Instant::now())
    }

    /// [`handle_event`](Self::handle_event) with an explicit timestamp for
    /// double-click timing.
    pub fn handle_event_at(
        &mut self,
        event: InputEvent,
        now: Instant,
    ) -> Option<ViewerCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed, now)
            }
            InputEvent::Scroll { delta } => Some(ViewerCommand::Zoom { delta }),
            InputEvent::ModifiersChanged { shift, ctrl, alt } => {
                self.modifiers = Modifiers { shift, ctrl, alt };
                None
            }
            InputEvent::PointerLeft => {
                self.primary_pressed = false;
                self.middle_pressed = false;
                self.state.cancel();
                None
            }
        }
    }

    /// Cursor moved: compute the delta and maybe produce a camera command.
    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<ViewerCommand> {
        let delta = self.state.handle_mouse_position(x, y);
        if delta == Vec2::ZERO {
            return None;
        }
        if self.middle_pressed || (self.primary_pressed && self.modifiers.shift) {
            return Some(ViewerCommand::PanCamera { delta });
        }
        if self.primary_pressed {
            return Some(ViewerCommand::RotateCamera { delta });
        }
        None
    }

    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        now: Instant,
    ) -> Option<ViewerCommand> {
        match button {
            MouseButton::Middle => {
                self.middle_pressed = pressed;
                None
            }
            MouseButton::Right => None,
            MouseButton::Left if pressed => {
                self.primary_pressed = true;
                self.state.handle_mouse_down();
                None
            }
            MouseButton::Left => {
                self.primary_pressed = false;
                match self.state.process_mouse_up(now) {
                    ClickResult::DoubleClick { position } => Some(ViewerCommand::Pick {
                        x: position.x,
                        y: position.y,
                    }),
                    ClickResult::NoAction | ClickResult::SingleClick => None,
                }
            }
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use web_time::Duration;

    use super::*;

    fn press(
        input: &mut InputProcessor,
        button: MouseButton,
        pressed: bool,
        now: Instant,
    ) -> Option<ViewerCommand> {
        input.handle_event_at(InputEvent::MouseButton { button, pressed }, now)
    }

    fn move_to(input: &mut InputProcessor, x: f32, y: f32) -> Option<ViewerCommand> {
        input.handle_event(InputEvent::CursorMoved { x, y })
    }

    fn set_modifiers(input: &mut InputProcessor, shift: bool, ctrl: bool) {
        let _ = input.handle_event(InputEvent::ModifiersChanged {
            shift,
            ctrl,
            alt: false,
        });
    }

    #[test]
    fn primary_drag_rotates() {
        let mut input = InputProcessor::new();
        let now = Instant::now();
        let _ = move_to(&mut input, 10.0, 10.0);
        let _ = press(&mut input, MouseButton::Left, true, now);
        assert_eq!(
            move_to(&mut input, 15.0, 8.0),
            Some(ViewerCommand::RotateCamera {
                delta: Vec2::new(5.0, -2.0)
            })
        );
    }

    #[test]
    fn shift_drag_and_middle_drag_pan() {
        let mut input = InputProcessor::new();
        let now = Instant::now();
        set_modifiers(&mut input, true, false);
        let _ = press(&mut input, MouseButton::Left, true, now);
        assert!(matches!(
            move_to(&mut input, 3.0, 0.0),
            Some(ViewerCommand::PanCamera { .. })
        ));
        let _ = press(&mut input, MouseButton::Left, false, now);
        set_modifiers(&mut input, false, false);

        let _ = press(&mut input, MouseButton::Middle, true, now);
        assert!(matches!(
            move_to(&mut input, 6.0, 0.0),
            Some(ViewerCommand::PanCamera { .. })
        ));
    }

    #[test]
    fn hover_without_button_is_silent() {
        let mut input = InputProcessor::new();
        assert_eq!(move_to(&mut input, 50.0, 50.0), None);
    }

    #[test]
    fn scroll_zooms() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::Scroll { delta: -1.0 }),
            Some(ViewerCommand::Zoom { delta: -1.0 })
        );
    }

    #[test]
    fn double_click_picks_at_cursor() {
        let mut input = InputProcessor::new();
        let t0 = Instant::now();
        let _ = move_to(&mut input, 120.0, 80.0);
        let _ = press(&mut input, MouseButton::Left, true, t0);
        assert_eq!(press(&mut input, MouseButton::Left, false, t0), None);
        let t1 = t0 + Duration::from_millis(150);
        let _ = press(&mut input, MouseButton::Left, true, t1);
        assert_eq!(
            press(&mut input, MouseButton::Left, false, t1),
            Some(ViewerCommand::Pick { x: 120.0, y: 80.0 })
        );
    }

    #[test]
    fn drag_between_clicks_suppresses_pick() {
        let mut input = InputProcessor::new();
        let t0 = Instant::now();
        let _ = press(&mut input, MouseButton::Left, true, t0);
        let _ = press(&mut input, MouseButton::Left, false, t0);
        let _ = press(&mut input, MouseButton::Left, true, t0);
        let _ = move_to(&mut input, 40.0, 0.0);
        assert_eq!(press(&mut input, MouseButton::Left, false, t0), None);
    }

    #[test]
    fn pointer_leave_ends_drag() {
        let mut input = InputProcessor::new();
        let now = Instant::now();
        let _ = press(&mut input, MouseButton::Left, true, now);
        assert!(input.is_dragging());
        let _ = input.handle_event(InputEvent::PointerLeft);
        assert!(!input.is_dragging());
        assert_eq!(move_to(&mut input, 30.0, 30.0), None);
    }

    #[test]
    fn default_key_bindings() {
        let input = InputProcessor::new();
        assert_eq!(input.handle_key_press("KeyR"), Some(ViewerCommand::ResetCamera));
        assert_eq!(
            input.handle_key_press("ArrowLeft"),
            Some(ViewerCommand::PanStep {
                direction: Vec2::new(-1.0, 0.0)
            })
        );
        assert_eq!(input.handle_key_press("KeyV"), Some(ViewerCommand::ToggleMode));
        assert_eq!(input.handle_key_press("Escape"), Some(ViewerCommand::DismissError));
        assert_eq!(input.handle_key_press("KeyD"), None);
    }

    #[test]
    fn chord_uses_held_modifiers() {
        let mut input = InputProcessor::new();
        set_modifiers(&mut input, true, true);
        assert_eq!(
            input.handle_key_press("KeyD"),
            Some(ViewerCommand::ToggleDiagnostics)
        );
        assert_eq!(input.handle_key_press("KeyR"), None);
    }

    #[test]
    fn rebinding() {
        let mut bindings = KeyBindings::default();
        bindings.bind("KeyX", KeyCommandTag::ToggleMode);
        let input = InputProcessor::with_key_bindings(bindings);
        assert_eq!(input.handle_key_press("KeyX"), Some(ViewerCommand::ToggleMode));
        assert!(input.key_bindings().lookup("KeyV").is_some());
    }
}
