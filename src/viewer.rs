//! Standalone visualization window backed by winit.
//!
//! ```no_run
//! # use molscope::Viewer;
//! Viewer::builder()
//!     .with_path("assets/models/1crn.pdb")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    engine::MolecularEngine,
    error::MolscopeError,
    gpu::render_context::RenderContext,
    input::{InputEvent, InputProcessor, MouseButton},
    options::Options,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    path: Option<PathBuf>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            path: None,
            options: None,
            title: "Molscope".into(),
        }
    }

    /// Structure file to load once the window is up (`.pdb` or `.ent`).
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            path: self.path,
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays one molecular structure.
///
/// Structure files dropped onto the window replace the current one.
pub struct Viewer {
    path: Option<PathBuf>,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`MolscopeError::Viewer`] if the event loop fails, or the
    /// GPU setup error if the engine cannot be created.
    pub fn run(self) -> Result<(), MolscopeError> {
        let event_loop =
            EventLoop::new().map_err(|e| MolscopeError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            input: InputProcessor::with_key_bindings(self.options.keybindings.clone()),
            path: self.path,
            options: Some(self.options),
            title: self.title,
            setup_error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| MolscopeError::Viewer(e.to_string()))?;

        // Engine (and every GPU resource) goes before the window surface.
        drop(app.engine.take());
        app.setup_error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<MolecularEngine>,
    input: InputProcessor,
    path: Option<PathBuf>,
    options: Option<Options>,
    title: String,
    setup_error: Option<MolscopeError>,
}

fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn create_engine(&mut self, window: &Arc<Window>) -> Result<MolecularEngine, MolscopeError> {
        let size = viewport_size(window.inner_size());
        let options = self.options.take().unwrap_or_default();
        let context = pollster::block_on(RenderContext::new(
            window.clone(),
            size,
            options.display.vsync,
        ))?;
        let mut engine = MolecularEngine::new(context, options)?;
        if let Some(path) = self.path.take() {
            // Failures land in the engine's error state and the log.
            let _ = engine.load_path(&path);
        }
        Ok(engine)
    }

    fn dispatch(&mut self, event: InputEvent) {
        if let (Some(cmd), Some(engine)) =
            (self.input.handle_event(event), &mut self.engine)
        {
            engine.execute(cmd);
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                self.setup_error = Some(MolscopeError::Viewer(e.to_string()));
                event_loop.exit();
                return;
            }
        };

        match self.create_engine(&window) {
            Ok(engine) => self.engine = Some(engine),
            Err(e) => {
                // Reported once; no frame loop is started.
                log::error!("Failed to initialize engine: {e}");
                self.setup_error = Some(e);
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                let (w, h) = viewport_size(size);
                if let Some(engine) = &mut self.engine {
                    engine.resize(w, h);
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(engine) = &mut self.engine {
                    let _ = engine.frame();
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::DroppedFile(path) => {
                if let Some(engine) = &mut self.engine {
                    if let Err(e) = engine.load_path(&path) {
                        log::warn!("ignored dropped file: {e}");
                    }
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                self.dispatch(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.dispatch(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::CursorLeft { .. } => self.dispatch(InputEvent::PointerLeft),

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.dispatch(InputEvent::Scroll {
                    delta: scroll_delta,
                });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.dispatch(InputEvent::ModifiersChanged {
                    shift: state.shift_key(),
                    ctrl: state.control_key(),
                    alt: state.alt_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let key_str = format!("{code:?}");
                if let (Some(cmd), Some(engine)) =
                    (self.input.handle_key_press(&key_str), &mut self.engine)
                {
                    engine.execute(cmd);
                }
            }

            _ => (),
        }
    }
}
