//! GPU-side scene buffers.
//!
//! The sphere mesh is uploaded once. The atom instance buffer is replaced
//! wholesale on every load. Ribbon buffers exist only while ribbon mode is
//! active and are recreated from scratch whenever the ribbon changes.

use serde::Serialize;
use wgpu::util::DeviceExt;

use crate::geometry::{RibbonMesh, SphereMesh};
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::structure::AtomInstance;

/// Bytes between consecutive instance records (7 floats).
pub const INSTANCE_STRIDE_BYTES: u64 = size_of::<AtomInstance>() as u64;

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![2 => Float32x3, 3 => Float32x3, 4 => Float32];

/// Vertex layouts for the instanced sphere pipeline: mesh position and
/// normal streams plus the per-atom instance stream.
pub fn sphere_vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    [
        float3_layout(0),
        float3_layout(1),
        wgpu::VertexBufferLayout {
            array_stride: INSTANCE_STRIDE_BYTES,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRIBUTES,
        },
    ]
}

/// Vertex layouts for the ribbon pipeline: position, normal, color.
pub fn ribbon_vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    [float3_layout(0), float3_layout(1), float3_layout(2)]
}

const LOCATION_0: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const LOCATION_1: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const LOCATION_2: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

/// Tightly packed `vec3<f32>` stream bound at `location`.
fn float3_layout(location: u32) -> wgpu::VertexBufferLayout<'static> {
    let attributes: &'static [wgpu::VertexAttribute] = match location {
        0 => &LOCATION_0,
        1 => &LOCATION_1,
        _ => &LOCATION_2,
    };
    wgpu::VertexBufferLayout {
        array_stride: size_of::<[f32; 3]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

/// Vertex/index counts exposed for diagnostics and draw sizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BufferCounts {
    /// Vertices in the shared sphere mesh.
    pub sphere_vertices: u32,
    /// Indices in the shared sphere mesh.
    pub sphere_indices: u32,
    /// Atom instances uploaded.
    pub instances: u32,
    /// Ribbon vertices (0 when no ribbon is resident).
    pub ribbon_vertices: u32,
    /// Ribbon indices (0 when no ribbon is resident).
    pub ribbon_indices: u32,
}

fn vertex_buffer(device: &wgpu::Device, label: &str, data: &[[f32; 3]]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

fn index_buffer(device: &wgpu::Device, label: &str, data: &[u32]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::INDEX,
    })
}

/// Static unit-sphere mesh streams.
struct SphereBuffers {
    positions: wgpu::Buffer,
    normals: wgpu::Buffer,
    indices: wgpu::Buffer,
    vertex_count: u32,
    index_count: u32,
}

impl SphereBuffers {
    fn destroy(&self) {
        self.positions.destroy();
        self.normals.destroy();
        self.indices.destroy();
    }
}

/// Ribbon streams, resident only in ribbon mode.
struct RibbonBuffers {
    positions: wgpu::Buffer,
    normals: wgpu::Buffer,
    colors: wgpu::Buffer,
    indices: wgpu::Buffer,
    vertex_count: u32,
    index_count: u32,
}

impl RibbonBuffers {
    fn new(device: &wgpu::Device, mesh: &RibbonMesh) -> Self {
        Self {
            positions: vertex_buffer(device, "Ribbon Positions", &mesh.positions),
            normals: vertex_buffer(device, "Ribbon Normals", &mesh.normals),
            colors: vertex_buffer(device, "Ribbon Colors", &mesh.colors),
            indices: index_buffer(device, "Ribbon Indices", &mesh.indices),
            vertex_count: mesh.vertex_count() as u32,
            index_count: mesh.index_count() as u32,
        }
    }

    fn destroy(&self) {
        self.positions.destroy();
        self.normals.destroy();
        self.colors.destroy();
        self.indices.destroy();
    }
}

/// All geometry the frame pipeline draws from.
pub struct SceneBuffers {
    sphere: SphereBuffers,
    instances: TypedBuffer<AtomInstance>,
    ribbon: Option<RibbonBuffers>,
}

impl SceneBuffers {
    /// Upload the shared sphere mesh and allocate an empty instance buffer.
    pub fn new(device: &wgpu::Device, sphere: &SphereMesh) -> Self {
        let sphere = SphereBuffers {
            positions: vertex_buffer(device, "Sphere Positions", &sphere.positions),
            normals: vertex_buffer(device, "Sphere Normals", &sphere.normals),
            indices: index_buffer(device, "Sphere Indices", &sphere.indices),
            vertex_count: sphere.vertex_count() as u32,
            index_count: sphere.index_count() as u32,
        };
        let instances = TypedBuffer::with_capacity(
            device,
            "Atom Instances",
            1024,
            wgpu::BufferUsages::VERTEX,
        );
        Self {
            sphere,
            instances,
            ribbon: None,
        }
    }

    /// Replace every atom instance.
    pub fn upload_instances(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[AtomInstance],
    ) {
        if self.instances.write(device, queue, instances) {
            log::debug!("instance buffer grown for {} atoms", instances.len());
        }
    }

    /// Replace the ribbon buffers (an empty mesh leaves none resident).
    pub fn upload_ribbon(&mut self, device: &wgpu::Device, mesh: &RibbonMesh) {
        self.release_ribbon();
        if !mesh.is_empty() {
            self.ribbon = Some(RibbonBuffers::new(device, mesh));
        }
    }

    /// Drop the ribbon buffers, if any.
    pub fn release_ribbon(&mut self) {
        if let Some(ribbon) = self.ribbon.take() {
            ribbon.destroy();
        }
    }

    /// Whether ribbon buffers are resident.
    pub fn has_ribbon(&self) -> bool {
        self.ribbon.is_some()
    }

    /// Current counts.
    pub fn counts(&self) -> BufferCounts {
        let (ribbon_vertices, ribbon_indices) = self
            .ribbon
            .as_ref()
            .map_or((0, 0), |r| (r.vertex_count, r.index_count));
        BufferCounts {
            sphere_vertices: self.sphere.vertex_count,
            sphere_indices: self.sphere.index_count,
            instances: self.instances.count() as u32,
            ribbon_vertices,
            ribbon_indices,
        }
    }

    /// Bind sphere + instance streams and issue one instanced draw.
    ///
    /// Returns `false` when there is nothing to draw.
    pub fn draw_spheres(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let instance_count = self.instances.count() as u32;
        if instance_count == 0 || self.sphere.index_count == 0 {
            return false;
        }
        pass.set_vertex_buffer(0, self.sphere.positions.slice(..));
        pass.set_vertex_buffer(1, self.sphere.normals.slice(..));
        pass.set_vertex_buffer(2, self.instances.buffer().slice(..));
        pass.set_index_buffer(self.sphere.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.sphere.index_count, 0, 0..instance_count);
        true
    }

    /// Bind ribbon streams and issue one indexed draw.
    ///
    /// Returns `false` when no ribbon is resident.
    pub fn draw_ribbon(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(ribbon) = self.ribbon.as_ref() else {
            return false;
        };
        pass.set_vertex_buffer(0, ribbon.positions.slice(..));
        pass.set_vertex_buffer(1, ribbon.normals.slice(..));
        pass.set_vertex_buffer(2, ribbon.colors.slice(..));
        pass.set_index_buffer(ribbon.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..ribbon.index_count, 0, 0..1);
        true
    }

    /// Release every buffer.
    pub fn destroy(&mut self) {
        self.release_ribbon();
        self.instances.destroy();
        self.sphere.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_stride_is_seven_floats() {
        assert_eq!(INSTANCE_STRIDE_BYTES, 28);
        let layouts = sphere_vertex_layouts();
        assert_eq!(layouts[2].step_mode, wgpu::VertexStepMode::Instance);
        let offsets: Vec<u64> =
            layouts[2].attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
    }

    #[test]
    fn ribbon_layout_locations() {
        let locations: Vec<u32> = ribbon_vertex_layouts()
            .iter()
            .map(|l| l.attributes[0].shader_location)
            .collect();
        assert_eq!(locations, vec![0, 1, 2]);
    }
}
