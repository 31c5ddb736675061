//! Frame pipeline: camera uniform, two pipelines over one shader program,
//! and the per-frame draw for the active visualization mode.

pub(crate) mod pipeline_util;
pub mod scene_buffers;

use std::fmt;

use naga_oil::compose::ComposerError;
use wgpu::util::DeviceExt;

use crate::camera::CameraUniform;
use crate::geometry::{create_sphere_mesh, RibbonMesh};
use crate::gpu::render_context::{RenderContext, RenderContextError};
use crate::gpu::shader_composer::{
    ShaderComposer, MOLECULE_SHADER, MOLECULE_SHADER_PATH,
};
use crate::options::{Options, VisualizationMode};
use crate::structure::AtomInstance;
use pipeline_util::DepthTexture;
pub use scene_buffers::BufferCounts;
use scene_buffers::SceneBuffers;

/// Errors raised while building the render pipeline.
#[derive(Debug)]
pub enum RenderError {
    /// GPU context initialization failed.
    Context(RenderContextError),
    /// WGSL composition failed.
    Shader {
        /// Shader file that failed.
        file_path: String,
        /// Composer diagnostic.
        message: String,
    },
    /// wgpu reported a validation or out-of-memory error during setup.
    Setup(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context(e) => write!(f, "GPU context error: {e}"),
            Self::Shader { file_path, message } => {
                write!(f, "shader '{file_path}' failed to compose: {message}")
            }
            Self::Setup(msg) => write!(f, "GPU setup failed: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Context(e) => Some(e),
            Self::Shader { .. } | Self::Setup(_) => None,
        }
    }
}

impl From<RenderContextError> for RenderError {
    fn from(e: RenderContextError) -> Self {
        Self::Context(e)
    }
}

fn shader_error(file_path: &str, e: &ComposerError) -> RenderError {
    RenderError::Shader {
        file_path: file_path.to_owned(),
        message: e.to_string(),
    }
}

/// What happened to one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Cleared and drew the active mode's geometry.
    Drawn,
    /// Cleared only; the active mode has no resident geometry.
    Empty,
    /// No surface texture this frame (lost, outdated or timed out).
    Skipped,
}

/// GPU pipelines and buffers. Owns the render context.
///
/// Every GPU object is created in [`Renderer::new`] and released together
/// when the renderer drops, including when setup fails part-way.
pub struct Renderer {
    context: RenderContext,
    sphere_pipeline: wgpu::RenderPipeline,
    ribbon_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth: DepthTexture,
    buffers: SceneBuffers,
    clear_color: wgpu::Color,
}

impl Renderer {
    /// Compose shaders, build pipelines and upload the sphere mesh.
    ///
    /// Setup runs inside validation and out-of-memory error scopes, so a
    /// failure is reported once here instead of surfacing as an
    /// uncaptured error later.
    pub fn new(context: RenderContext, options: &Options) -> Result<Self, RenderError> {
        let device = &context.device;
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let built = Self::build(&context, options);

        let validation = pollster::block_on(device.pop_error_scope());
        let out_of_memory = pollster::block_on(device.pop_error_scope());
        if let Some(e) = validation.or(out_of_memory) {
            log::error!("renderer setup failed: {e}");
            return Err(RenderError::Setup(e.to_string()));
        }
        let parts = built?;

        let [r, g, b] = options.display.background;
        log::info!(
            "renderer ready ({}x{}, {:?})",
            context.config.width,
            context.config.height,
            context.format(),
        );
        Ok(Self {
            context,
            sphere_pipeline: parts.sphere_pipeline,
            ribbon_pipeline: parts.ribbon_pipeline,
            camera_buffer: parts.camera_buffer,
            camera_bind_group: parts.camera_bind_group,
            depth: parts.depth,
            buffers: parts.buffers,
            clear_color: wgpu::Color {
                r: f64::from(r),
                g: f64::from(g),
                b: f64::from(b),
                a: 1.0,
            },
        })
    }

    fn build(context: &RenderContext, options: &Options) -> Result<Parts, RenderError> {
        let device = &context.device;

        let mut composer = ShaderComposer::new()
            .map_err(|e| shader_error("modules", &e))?;
        let shader = composer
            .compose(device, "Molecule Shader", MOLECULE_SHADER, MOLECULE_SHADER_PATH)
            .map_err(|e| shader_error(MOLECULE_SHADER_PATH, &e))?;

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Molecule Pipeline Layout"),
            bind_group_layouts: &[&camera_layout],
            push_constant_ranges: &[],
        });

        let sphere_pipeline = create_pipeline(
            context,
            &PipelineDesc {
                label: "Sphere Pipeline",
                shader: &shader,
                layout: &layout,
                vertex_entry: "vs_sphere",
                buffers: &scene_buffers::sphere_vertex_layouts(),
                cull_mode: Some(wgpu::Face::Back),
            },
        );
        // Sheets are single-sided strips; draw the ribbon without culling.
        let ribbon_pipeline = create_pipeline(
            context,
            &PipelineDesc {
                label: "Ribbon Pipeline",
                shader: &shader,
                layout: &layout,
                vertex_entry: "vs_ribbon",
                buffers: &scene_buffers::ribbon_vertex_layouts(),
                cull_mode: None,
            },
        );

        let sphere = create_sphere_mesh(1.0, options.geometry.sphere_segments.max(3));
        let buffers = SceneBuffers::new(device, &sphere);
        let (width, height) = context.size();
        let depth = DepthTexture::new(device, width, height);

        Ok(Parts {
            sphere_pipeline,
            ribbon_pipeline,
            camera_buffer,
            camera_bind_group,
            depth,
            buffers,
        })
    }

    /// Surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        self.context.size()
    }

    /// Resize the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.context.resize(width, height) {
            self.depth.destroy();
            self.depth = DepthTexture::new(&self.context.device, width, height);
        }
    }

    /// Replace the atom instance buffer.
    pub fn upload_instances(&mut self, instances: &[AtomInstance]) {
        self.buffers.upload_instances(
            &self.context.device,
            &self.context.queue,
            instances,
        );
    }

    /// Replace the ribbon buffers.
    pub fn upload_ribbon(&mut self, mesh: &RibbonMesh) {
        self.buffers.upload_ribbon(&self.context.device, mesh);
    }

    /// Release the ribbon buffers (leaving ribbon mode).
    pub fn release_ribbon(&mut self) {
        self.buffers.release_ribbon();
    }

    /// Whether ribbon buffers are resident.
    pub fn has_ribbon(&self) -> bool {
        self.buffers.has_ribbon()
    }

    /// Current buffer counts.
    pub fn counts(&self) -> BufferCounts {
        self.buffers.counts()
    }

    /// Render one frame.
    ///
    /// Missing geometry is not an error: the frame is cleared and nothing
    /// is drawn. GPU validation errors raised by this frame are logged and
    /// the next frame is attempted as usual.
    pub fn render(
        &mut self,
        uniform: &CameraUniform,
        mode: VisualizationMode,
    ) -> FrameStatus {
        let frame = match self.context.get_next_frame() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.context.reconfigure();
                return FrameStatus::Skipped;
            }
            Err(e) => {
                log::warn!("failed to acquire frame: {e}");
                return FrameStatus::Skipped;
            }
        };

        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        self.context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(std::slice::from_ref(uniform)),
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        let drawn = {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Molecule Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: self.depth.view(),
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                ..Default::default()
            });
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            match mode {
                VisualizationMode::Spheres => {
                    pass.set_pipeline(&self.sphere_pipeline);
                    self.buffers.draw_spheres(&mut pass)
                }
                VisualizationMode::Ribbon => {
                    pass.set_pipeline(&self.ribbon_pipeline);
                    self.buffers.draw_ribbon(&mut pass)
                }
            }
        };
        self.context.submit(encoder);
        frame.present();

        if let Some(e) = pollster::block_on(device.pop_error_scope()) {
            log::warn!("GPU error during frame: {e}");
        }

        if drawn {
            FrameStatus::Drawn
        } else {
            FrameStatus::Empty
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.buffers.destroy();
        self.depth.destroy();
        self.camera_buffer.destroy();
        log::debug!("renderer resources released");
    }
}

/// Objects created during setup, moved into the renderer on success.
struct Parts {
    sphere_pipeline: wgpu::RenderPipeline,
    ribbon_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth: DepthTexture,
    buffers: SceneBuffers,
}

struct PipelineDesc<'a> {
    label: &'a str,
    shader: &'a wgpu::ShaderModule,
    layout: &'a wgpu::PipelineLayout,
    vertex_entry: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    cull_mode: Option<wgpu::Face>,
}

fn create_pipeline(
    context: &RenderContext,
    desc: &PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    context
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(desc.layout),
            vertex: wgpu::VertexState {
                module: desc.shader,
                entry_point: Some(desc.vertex_entry),
                buffers: desc.buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: desc.shader,
                entry_point: Some("fs_main"),
                targets: &pipeline_util::color_targets(context.format()),
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: desc.cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(pipeline_util::depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
}
