//! GPU-free view state: camera, scene, mode, selection and load status.
//!
//! All interaction funnels through [`ViewerState::execute`]; the engine
//! reads back what changed (camera uniform, ribbon rebuilds) once per
//! frame. Nothing here touches wgpu, so the whole interaction model is
//! testable headless.

use glam::Vec2;
use web_time::Instant;

use super::command::ViewerCommand;
use super::snapshot::{SelectedAtom, ViewSnapshot};
use crate::camera::{CameraController, CameraUniform};
use crate::geometry::RibbonMesh;
use crate::options::{Options, VisualizationMode};
use crate::picking::{pick_atom, PickResult, Ray};
use crate::renderer::BufferCounts;
use crate::scene::loader::{LoadError, LoadOutcome};
use crate::scene::Scene;
use crate::structure::ParsedStructure;

/// Owned interaction state, mutated only through its methods.
#[derive(Debug)]
pub struct ViewerState {
    camera: CameraController,
    scene: Scene,
    options: Options,
    mode: VisualizationMode,
    viewport: (u32, u32),
    selection: Option<usize>,
    diagnostics: bool,
    loading: bool,
    load_error: Option<LoadError>,
}

impl ViewerState {
    /// Empty state for the given options and viewport.
    #[must_use]
    pub fn new(options: Options, viewport: (u32, u32)) -> Self {
        Self {
            camera: CameraController::new(options.camera.clone()),
            scene: Scene::new(),
            mode: options.display.mode,
            options,
            viewport,
            selection: None,
            diagnostics: false,
            loading: false,
            load_error: None,
        }
    }

    /// Apply one command.
    pub fn execute(&mut self, command: ViewerCommand, now: Instant) {
        match command {
            ViewerCommand::RotateCamera { delta } => self.camera.rotate(delta),
            ViewerCommand::PanCamera { delta } => self.camera.pan(delta),
            ViewerCommand::PanStep { direction } => {
                let step = self.camera.options().arrow_pan_step;
                self.camera.pan(direction * step);
            }
            ViewerCommand::Zoom { delta } => self.camera.zoom(delta),
            ViewerCommand::ResetCamera => {
                self.camera.reset(self.scene.bounds().as_ref());
            }
            ViewerCommand::Pick { x, y } => {
                let _ = self.pick(Vec2::new(x, y), now);
            }
            ViewerCommand::SetMode(mode) => self.set_mode(mode),
            ViewerCommand::ToggleMode => self.set_mode(self.mode.toggled()),
            ViewerCommand::ToggleDiagnostics => {
                self.diagnostics = !self.diagnostics;
                log::info!(
                    "diagnostics {}",
                    if self.diagnostics { "on" } else { "off" }
                );
            }
            ViewerCommand::DismissError => self.dismiss_error(),
        }
    }

    /// Pick the atom under `pixel` and recentre on it.
    ///
    /// A miss clears the selection and leaves the camera alone.
    pub fn pick(&mut self, pixel: Vec2, now: Instant) -> Option<PickResult> {
        let (width, height) = self.viewport;
        let projection = self.camera.projection(width, height).matrix();
        let view = self.camera.state().view_matrix();
        let hit = Ray::from_screen(pixel, self.viewport, projection, view)
            .and_then(|ray| pick_atom(&ray, self.scene.instances()));

        self.selection = hit.map(|h| h.index);
        if let Some(hit) = hit {
            log::debug!("picked atom {} at {}", hit.index, hit.position);
            self.camera.animate_to_point(hit.position, now);
        }
        hit
    }

    /// Advance camera animations. Returns `true` while the camera moves.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.camera.tick(now)
    }

    /// Switch representation. Entering ribbon mode forces a rebuild.
    pub fn set_mode(&mut self, mode: VisualizationMode) {
        if mode == self.mode {
            return;
        }
        if mode == VisualizationMode::Ribbon {
            self.scene.mark_ribbon_stale();
        }
        log::info!("visualization mode: {mode:?}");
        self.mode = mode;
    }

    /// Record that a load was queued.
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Apply a finished load. Returns `true` when the structure changed.
    pub fn finish_load(&mut self, outcome: LoadOutcome) -> bool {
        self.loading = false;
        match outcome.result {
            Ok(structure) => {
                self.apply_structure(outcome.name, structure);
                true
            }
            Err(e) => {
                self.fail_load(e);
                false
            }
        }
    }

    /// Swap in a new structure and recentre the camera on it.
    pub fn apply_structure(&mut self, name: String, structure: ParsedStructure) {
        log::info!(
            "displaying {name}: {} atoms, {} residues in backbone",
            structure.atom_count(),
            structure.backbone.len(),
        );
        self.scene.replace(name, structure);
        self.selection = None;
        self.load_error = None;
        self.camera.reset(self.scene.bounds().as_ref());
    }

    /// Record a failed load. The displayed structure is kept.
    pub fn fail_load(&mut self, error: LoadError) {
        log::error!("load failed: {error}");
        self.loading = false;
        self.load_error = Some(error);
    }

    /// Record a request refused before it was queued. A load already in
    /// flight keeps running, so the loading flag is left alone.
    pub fn reject_load(&mut self, error: LoadError) {
        log::warn!("load rejected: {error}");
        self.load_error = Some(error);
    }

    /// Clear the last load error.
    pub fn dismiss_error(&mut self) {
        self.load_error = None;
    }

    /// Update the viewport used for projection and picking.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Uniform for the current camera, viewport and mode.
    #[must_use]
    pub fn camera_uniform(&self) -> CameraUniform {
        let (width, height) = self.viewport;
        CameraUniform::new(
            self.camera.state(),
            &self.camera.projection(width, height),
            self.mode.shader_flag(),
        )
    }

    /// New ribbon geometry when in ribbon mode and the backbone changed.
    pub fn take_ribbon_rebuild(&mut self) -> Option<RibbonMesh> {
        if self.mode != VisualizationMode::Ribbon {
            return None;
        }
        self.scene.take_ribbon_rebuild(&self.options.geometry)
    }

    /// Overlay snapshot.
    #[must_use]
    pub fn snapshot(&self, buffers: BufferCounts, fps: f32) -> ViewSnapshot {
        let camera = self.camera.state();
        ViewSnapshot {
            source: self.scene.source_name().map(str::to_owned),
            mode: self.mode,
            atom_count: self.scene.structure().atom_count(),
            buffers,
            rotation: camera.rotation.to_array(),
            distance: camera.distance,
            position: camera.position.to_array(),
            target: camera.target.to_array(),
            selected: self
                .selection
                .and_then(|i| self.scene.atom(i))
                .map(SelectedAtom::from),
            fps,
            loading: self.loading,
            error: self.load_error.as_ref().map(ToString::to_string),
        }
    }

    /// Camera controller.
    #[must_use]
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Displayed scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Active representation.
    #[must_use]
    pub fn mode(&self) -> VisualizationMode {
        self.mode
    }

    /// Viewport in physical pixels.
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Selected atom index.
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Whether periodic diagnostics are on.
    #[must_use]
    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    /// Whether a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last load error, until dismissed.
    #[must_use]
    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }
}
