//! Latitude/longitude sphere tessellation shared by every atom instance.

/// Indexed triangle mesh of a sphere centred at the origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SphereMesh {
    /// Vertex positions scaled by the requested radius.
    pub positions: Vec<[f32; 3]>,
    /// Outward unit normals (the unscaled unit-sphere positions).
    pub normals: Vec<[f32; 3]>,
    /// Triangle list, counter-clockwise seen from outside.
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices (three per triangle).
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Build a lat/long sphere with `segments` bands in each direction.
///
/// Produces `(segments + 1)^2` vertices and `2 * segments^2` triangles.
/// The pole rows carry degenerate triangles, which keeps the index count
/// uniform. `segments == 0` yields an empty mesh.
#[must_use]
pub fn create_sphere_mesh(radius: f32, segments: u32) -> SphereMesh {
    if segments == 0 {
        return SphereMesh::default();
    }
    let n = segments;
    let ring = n + 1;
    let vertex_count = (ring * ring) as usize;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);

    for lat in 0..=n {
        let theta = lat as f32 * std::f32::consts::PI / n as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for lon in 0..=n {
            let phi = lon as f32 * std::f32::consts::TAU / n as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let unit = [cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
            normals.push(unit);
            positions.push([unit[0] * radius, unit[1] * radius, unit[2] * radius]);
        }
    }

    let mut indices = Vec::with_capacity((6 * n * n) as usize);
    for lat in 0..n {
        for lon in 0..n {
            let first = lat * ring + lon;
            let second = first + ring;
            indices.extend_from_slice(&[first, first + 1, second]);
            indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    SphereMesh {
        positions,
        normals,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn counts_match_segment_formula() {
        for n in [1, 3, 8, 16] {
            let mesh = create_sphere_mesh(1.0, n);
            let n = n as usize;
            assert_eq!(mesh.vertex_count(), (n + 1) * (n + 1));
            assert_eq!(mesh.index_count() / 3, 2 * n * n);
            assert!(mesh.indices.iter().all(|&i| (i as usize) < (n + 1) * (n + 1)));
        }
    }

    #[test]
    fn normals_are_unit_and_scaled_by_radius() {
        let mesh = create_sphere_mesh(2.5, 12);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let p = Vec3::from_array(*p);
            let n = Vec3::from_array(*n);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((p - n * 2.5).length() < 1e-5);
        }
    }

    #[test]
    fn winding_faces_outward() {
        let mesh = create_sphere_mesh(1.0, 10);
        let mut checked = 0;
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.positions[i as usize]));
            let face = (b - a).cross(c - a);
            if face.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) > 0.0);
            checked += 1;
        }
        assert!(checked > 0);
    }

    #[test]
    fn deterministic() {
        assert_eq!(create_sphere_mesh(1.0, 7), create_sphere_mesh(1.0, 7));
    }

    #[test]
    fn zero_segments_is_empty() {
        let mesh = create_sphere_mesh(1.0, 0);
        assert!(mesh.positions.is_empty());
        assert!(mesh.indices.is_empty());
    }
}
