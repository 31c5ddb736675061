use glam::{Mat4, Vec2, Vec3};

/// Orbital camera parameters.
///
/// The view transform is composed as
/// `T(position) · T(0, 0, -distance) · Rx(pitch) · Ry(yaw) · T(-target)`:
/// the world is moved so `target` sits at the origin, rotated by yaw and
/// then pitch, pushed `distance` down the view axis, and finally offset by
/// the view-space pan `position`. `target` is therefore the orbit centre
/// and `position` a screen-aligned offset that leaves the orbit centre
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// `x` = pitch, `y` = yaw, in radians. Unclamped.
    pub rotation: Vec2,
    /// Orbit radius.
    pub distance: f32,
    /// World-space orbit centre.
    pub target: Vec3,
    /// View-space pan offset.
    pub position: Vec3,
    /// View-space pan velocity integrated by the momentum task.
    pub velocity: Vec3,
}

impl CameraState {
    /// Fresh state looking at the origin from `distance`.
    #[must_use]
    pub fn new(distance: f32) -> Self {
        Self {
            rotation: Vec2::ZERO,
            distance,
            target: Vec3::ZERO,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
        }
    }

    /// World → view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_translation(-self.target)
    }

    /// Camera position in world space.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        self.view_matrix().inverse().transform_point3(Vec3::ZERO)
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Projection {
    /// Aspect ratio of a pixel viewport; zero heights are treated as one.
    #[must_use]
    pub fn aspect_of(width: u32, height: u32) -> f32 {
        width.max(1) as f32 / height.max(1) as f32
    }

    /// Projection matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform holding both camera matrices and the shading mode flag.
pub struct CameraUniform {
    /// World → view matrix.
    pub view: [[f32; 4]; 4],
    /// View → clip matrix.
    pub projection: [[f32; 4]; 4],
    /// Camera world-space position.
    pub eye: [f32; 3],
    /// 0 = per-instance atom color, 1 = per-vertex ribbon color.
    pub render_mode: u32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0; 3],
            render_mode: 0,
        }
    }
}

impl CameraUniform {
    /// Build the uniform from the current camera state.
    #[must_use]
    pub fn new(state: &CameraState, projection: &Projection, render_mode: u32) -> Self {
        Self {
            view: state.view_matrix().to_cols_array_2d(),
            projection: projection.matrix().to_cols_array_2d(),
            eye: state.eye().to_array(),
            render_mode,
        }
    }
}
