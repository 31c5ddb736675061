use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// World-space ray with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin (the unprojected near-plane point for screen rays).
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Ray through `origin` along `direction` (normalized here).
    ///
    /// Returns `None` for a zero-length direction.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        Some(Self {
            origin,
            direction: direction.try_normalize()?,
        })
    }

    /// Unproject a pixel coordinate into a world-space ray.
    ///
    /// Pixels map to NDC with Y flipped (screen rows grow downward, clip Y
    /// grows upward). The near (depth 0) and far (depth 1) points are
    /// unprojected through the inverse view-projection; the ray starts at
    /// the near point. Returns `None` for an empty viewport or a singular
    /// transform.
    #[must_use]
    pub fn from_screen(
        pixel: Vec2,
        viewport: (u32, u32),
        projection: Mat4,
        view: Mat4,
    ) -> Option<Self> {
        let (width, height) = viewport;
        if width == 0 || height == 0 {
            return None;
        }
        let ndc = Vec2::new(
            2.0 * pixel.x / width as f32 - 1.0,
            1.0 - 2.0 * pixel.y / height as f32,
        );

        let view_proj = projection * view;
        if view_proj.determinant().abs() <= f32::EPSILON * f32::EPSILON {
            return None;
        }
        let inverse = view_proj.inverse();
        let unproject = |depth: f32| {
            let p = inverse * ndc.extend(depth).extend(1.0);
            p.xyz() / p.w
        };
        let near = unproject(0.0);
        let far = unproject(1.0);
        if !near.is_finite() || !far.is_finite() {
            return None;
        }
        Self::new(near, far - near)
    }

    /// Quadratic-discriminant ray/sphere test.
    ///
    /// Reports a hit when the ray's line meets the sphere and the far
    /// intersection lies at or ahead of the origin, so an origin inside the
    /// sphere always hits and a sphere wholly behind the origin never does.
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let oc = self.origin - center;
        // a == 1 for a unit direction
        let b = 2.0 * oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - 4.0 * c;
        if discriminant < 0.0 {
            return false;
        }
        let far = (-b + discriminant.sqrt()) * 0.5;
        far >= 0.0
    }

    /// Point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
