//! Frame orchestration: background loads, camera animation, ribbon
//! rebuilds and the draw, in that order, once per display refresh.
//!
//! [`MolecularEngine`] owns the GPU [`Renderer`], the
//! [`StructureLoader`] thread and the GPU-free [`ViewerState`]. Hosts feed
//! it [`ViewerCommand`]s (usually via
//! [`InputProcessor`](crate::input::InputProcessor)) and call
//! [`frame`](MolecularEngine::frame) from their redraw loop.

pub mod command;
pub mod snapshot;
pub mod state;

use std::path::Path;

use web_time::{Duration, Instant};

pub use command::ViewerCommand;
pub use snapshot::{SelectedAtom, ViewSnapshot};
pub use state::ViewerState;

use crate::error::MolscopeError;
use crate::gpu::render_context::RenderContext;
use crate::options::{Options, VisualizationMode};
use crate::renderer::{FrameStatus, Renderer};
use crate::scene::loader::{LoadError, StructureLoader};
use crate::util::frame_timing::FrameTiming;

/// The viewer engine.
pub struct MolecularEngine {
    state: ViewerState,
    renderer: Renderer,
    loader: StructureLoader,
    frame_timing: FrameTiming,
    last_diagnostics: Instant,
}

impl MolecularEngine {
    /// Build the render pipeline on `context` and start the loader thread.
    ///
    /// # Errors
    ///
    /// Returns [`MolscopeError::ThreadSpawn`] if the loader cannot start
    /// and [`MolscopeError::Render`] if pipeline setup fails. In both
    /// cases every GPU resource created so far is released.
    pub fn new(context: RenderContext, options: Options) -> Result<Self, MolscopeError> {
        let viewport = context.size();
        let loader = StructureLoader::new().map_err(MolscopeError::ThreadSpawn)?;
        let renderer = Renderer::new(context, &options)?;
        Ok(Self {
            state: ViewerState::new(options, viewport),
            renderer,
            loader,
            frame_timing: FrameTiming::new(),
            last_diagnostics: Instant::now(),
        })
    }

    /// Apply one command.
    pub fn execute(&mut self, command: ViewerCommand) {
        self.state.execute(command, Instant::now());
    }

    /// Load a structure file in the background.
    ///
    /// The current structure stays on screen until the new one is parsed.
    pub fn load_path(&mut self, path: &Path) -> Result<(), LoadError> {
        let queued = self.loader.load_path(path).map(|_| ());
        self.after_submit(queued)
    }

    /// Load structure bytes in the background. `name` must carry a
    /// supported extension.
    pub fn load_bytes(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), LoadError> {
        let queued = self.loader.load_bytes(name, bytes).map(|_| ());
        self.after_submit(queued)
    }

    fn after_submit(&mut self, queued: Result<(), LoadError>) -> Result<(), LoadError> {
        match &queued {
            Ok(()) => self.state.begin_load(),
            Err(e) => self.state.reject_load(e.clone()),
        }
        queued
    }

    /// Resize the surface and viewport. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.renderer.resize(width, height);
        self.state.set_viewport(width, height);
    }

    /// Run one frame.
    pub fn frame(&mut self) -> FrameStatus {
        let now = Instant::now();

        if let Some(outcome) = self.loader.try_recv() {
            // Scene and instance buffer swap together, before this frame's
            // draw.
            if self.state.finish_load(outcome) {
                self.renderer.upload_instances(self.state.scene().instances());
            }
        }

        let _ = self.state.tick(now);

        if let Some(mesh) = self.state.take_ribbon_rebuild() {
            self.renderer.upload_ribbon(&mesh);
        } else if self.state.mode() == VisualizationMode::Spheres
            && self.renderer.has_ribbon()
        {
            self.renderer.release_ribbon();
        }

        let status = self
            .renderer
            .render(&self.state.camera_uniform(), self.state.mode());
        self.frame_timing.end_frame();
        self.log_diagnostics(now);
        status
    }

    fn log_diagnostics(&mut self, now: Instant) {
        if !self.state.diagnostics_enabled() {
            return;
        }
        let secs = self.state.options().display.diagnostics_interval_secs;
        let interval =
            Duration::try_from_secs_f32(secs.max(0.0)).unwrap_or(Duration::MAX);
        if now.saturating_duration_since(self.last_diagnostics) < interval {
            return;
        }
        self.last_diagnostics = now;
        log::info!("{}", self.snapshot().to_json());
    }

    /// Read-only snapshot for overlays.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        self.state
            .snapshot(self.renderer.counts(), self.frame_timing.fps())
    }

    /// Interaction state.
    #[must_use]
    pub fn state(&self) -> &ViewerState {
        &self.state
    }
}
