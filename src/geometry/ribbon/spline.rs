//! Spline math and frame computation for backbone geometry.
//!
//! Pure Vec3 → Vec3 transforms with no GPU or secondary-structure
//! dependencies.

use glam::{Quat, Vec3};

/// A sample along the spline with its local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SplinePoint {
    pub pos: Vec3,
    pub tangent: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

/// Pad a control polygon by duplicating its first and last points, so
/// every real point has a neighbour on each side.
pub(crate) fn pad_endpoints(points: &[Vec3]) -> Vec<Vec3> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    let mut padded = Vec::with_capacity(points.len() + 2);
    padded.push(first);
    padded.extend_from_slice(points);
    padded.push(last);
    padded
}

/// Uniform Catmull-Rom position between `p1` (t = 0) and `p2` (t = 1).
pub(crate) fn catmull_rom_point(p: [Vec3; 4], t: f32) -> Vec3 {
    let [p0, p1, p2, p3] = p;
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Analytic derivative of [`catmull_rom_point`] with respect to `t`.
pub(crate) fn catmull_rom_tangent(p: [Vec3; 4], t: f32) -> Vec3 {
    let [p0, p1, p2, p3] = p;
    let t2 = t * t;
    0.5 * ((-p0 + p2)
        + 2.0 * (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t
        + 3.0 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t2)
}

/// Build a frame from a tangent and the world-up reference.
///
/// Falls back to world X when the tangent is (anti)parallel to world up,
/// and to a chord-free default when the tangent itself vanishes.
pub(crate) fn frame_at(pos: Vec3, tangent: Vec3) -> SplinePoint {
    let tangent = tangent.try_normalize().unwrap_or(Vec3::Z);
    let right = tangent
        .cross(Vec3::Y)
        .try_normalize()
        .or_else(|| tangent.cross(Vec3::X).try_normalize())
        .unwrap_or(Vec3::X);
    let up = right.cross(tangent).normalize_or_zero();
    SplinePoint {
        pos,
        tangent,
        right,
        up,
    }
}

/// Rotate the frame around its tangent by `angle` radians.
pub(crate) fn twist(frame: SplinePoint, angle: f32) -> SplinePoint {
    let q = Quat::from_axis_angle(frame.tangent, angle);
    SplinePoint {
        right: q * frame.right,
        up: q * frame.up,
        ..frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn interpolates_inner_control_points() {
        let p = [
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 1.0, 3.0),
        ];
        assert!(approx(catmull_rom_point(p, 0.0), p[1]));
        assert!(approx(catmull_rom_point(p, 1.0), p[2]));
    }

    #[test]
    fn tangent_matches_finite_difference() {
        let p = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 1.0, 1.0),
            Vec3::new(4.0, 0.0, 2.0),
        ];
        let h = 1e-3;
        for t in [0.1, 0.5, 0.9] {
            let fd = (catmull_rom_point(p, t + h) - catmull_rom_point(p, t - h))
                / (2.0 * h);
            assert!((fd - catmull_rom_tangent(p, t)).length() < 1e-2);
        }
    }

    #[test]
    fn frame_is_orthonormal() {
        for tangent in [Vec3::X, Vec3::new(0.3, 0.2, -1.0), Vec3::Y, -Vec3::Y] {
            let f = frame_at(Vec3::ZERO, tangent);
            assert!((f.tangent.length() - 1.0).abs() < 1e-5);
            assert!((f.right.length() - 1.0).abs() < 1e-5);
            assert!((f.up.length() - 1.0).abs() < 1e-5);
            assert!(f.tangent.dot(f.right).abs() < 1e-5);
            assert!(f.tangent.dot(f.up).abs() < 1e-5);
            assert!(f.right.dot(f.up).abs() < 1e-5);
        }
    }

    #[test]
    fn twist_keeps_tangent() {
        let f = frame_at(Vec3::ZERO, Vec3::X);
        let t = twist(f, 1.0);
        assert_eq!(t.tangent, f.tangent);
        assert!(t.right.dot(t.up).abs() < 1e-5);
        assert!(!approx(t.right, f.right));
    }

    #[test]
    fn padding_duplicates_ends() {
        let pts = [Vec3::X, Vec3::Y, Vec3::Z];
        let padded = pad_endpoints(&pts);
        assert_eq!(padded, vec![Vec3::X, Vec3::X, Vec3::Y, Vec3::Z, Vec3::Z]);
        assert!(pad_endpoints(&[]).is_empty());
    }
}
