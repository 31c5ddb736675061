use glam::{Vec2, Vec3};
use web_time::{Duration, Instant};

use super::core::{CameraState, Projection};
use crate::animation::{FrameTask, TaskStatus};
use crate::options::CameraOptions;
use crate::structure::Bounds;
use crate::util::easing::EasingFunction;

/// Headroom kept between the farthest scene point and the far plane.
const FAR_PLANE_MARGIN: f32 = 1.5;

/// Coasting after a pan. Velocity lives on [`CameraState`].
#[derive(Debug, Clone, Copy, Default)]
struct Momentum {
    steps: u32,
}

/// Eased recentre toward a picked point.
#[derive(Debug, Clone, Copy)]
struct FocusAnimation {
    start: Instant,
    duration: Duration,
    easing: EasingFunction,
    from_target: Vec3,
    from_position: Vec3,
    to_target: Vec3,
}

impl FocusAnimation {
    fn step(&self, state: &mut CameraState, now: Instant) -> TaskStatus {
        let elapsed = now.saturating_duration_since(self.start);
        let t = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f32() / self.duration.as_secs_f32()
        };
        let eased = self.easing.evaluate(t);
        state.target = self.from_target.lerp(self.to_target, eased);
        state.position = self.from_position.lerp(Vec3::ZERO, eased);
        state.velocity = Vec3::ZERO;
        if t >= 1.0 {
            state.target = self.to_target;
            state.position = Vec3::ZERO;
            TaskStatus::Finished
        } else {
            TaskStatus::Running
        }
    }
}

/// Orbital camera: the only writer of [`CameraState`].
///
/// Interactive operations mutate the state immediately; pan momentum and
/// the pick recentre animation are frame tasks advanced by [`tick`].
///
/// [`tick`]: CameraController::tick
#[derive(Debug, Clone)]
pub struct CameraController {
    state: CameraState,
    options: CameraOptions,
    /// Largest extent of the structure last reset onto; zero without one.
    scene_extent: f32,
    momentum: FrameTask<Momentum>,
    focus: FrameTask<FocusAnimation>,
}

impl CameraController {
    /// Controller at the default pose for `options`.
    #[must_use]
    pub fn new(options: CameraOptions) -> Self {
        let state = CameraState::new(options.clamp_distance(options.default_distance));
        Self {
            state,
            options,
            scene_extent: 0.0,
            momentum: FrameTask::new(),
            focus: FrameTask::new(),
        }
    }

    /// Current camera parameters.
    #[must_use]
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Active control options.
    #[must_use]
    pub fn options(&self) -> &CameraOptions {
        &self.options
    }

    /// Replace control options, re-clamping the current distance.
    pub fn set_options(&mut self, options: CameraOptions) {
        self.options = options;
        self.state.distance = self.options.clamp_distance(self.state.distance);
    }

    /// Projection for a viewport of the given pixel size.
    ///
    /// The far plane is pushed out past the orbit distance plus the scene's
    /// extent, so zooming out never clips the structure.
    #[must_use]
    pub fn projection(&self, width: u32, height: u32) -> Projection {
        // Any orbit centre lies inside the bounding box, so no atom is more
        // than two extents from it.
        let farthest = self.state.distance + 2.0 * self.scene_extent;
        Projection {
            fovy: self.options.fovy,
            aspect: Projection::aspect_of(width, height),
            znear: self.options.znear,
            zfar: self.options.zfar.max(farthest * FAR_PLANE_MARGIN),
        }
    }

    /// Orbit by a pointer delta in pixels. Cancels pan momentum.
    pub fn rotate(&mut self, delta: Vec2) {
        self.state.rotation.x += delta.y * self.options.rotate_speed;
        self.state.rotation.y += delta.x * self.options.rotate_speed;
        self.stop_momentum();
    }

    /// Start a pan from a pointer delta in pixels.
    ///
    /// The displacement is set as velocity in view space (x right, y up), so
    /// it always follows the current orientation, and scales with distance.
    /// The momentum task applies it over the following frames.
    pub fn pan(&mut self, delta: Vec2) {
        let scale = self.state.distance * self.options.pan_speed;
        self.state.velocity = Vec3::new(delta.x, -delta.y, 0.0) * scale;
        if self.state.velocity == Vec3::ZERO {
            let _ = self.momentum.cancel();
        } else if !self.momentum.is_active() {
            let _ = self.momentum.start(Momentum::default());
        }
    }

    /// Zoom in (`delta > 0`) or out (`delta < 0`) by one factor step.
    pub fn zoom(&mut self, delta: f32) {
        let factor = self.options.zoom_factor.max(1.0);
        let distance = if delta > 0.0 {
            self.state.distance / factor
        } else if delta < 0.0 {
            self.state.distance * factor
        } else {
            self.state.distance
        };
        self.state.distance = self.options.clamp_distance(distance);
        self.stop_momentum();
    }

    /// Recentre on `bounds`, or return to the default pose.
    ///
    /// Cancels momentum and any recentre animation.
    pub fn reset(&mut self, bounds: Option<&Bounds>) {
        let _ = self.focus.cancel();
        self.stop_momentum();
        self.state.rotation = Vec2::ZERO;
        self.state.position = Vec3::ZERO;
        match bounds {
            Some(bounds) => {
                self.scene_extent = bounds.largest_extent();
                self.state.target = bounds.centroid();
                self.state.distance = self.options.clamp_distance(
                    bounds.largest_extent() * self.options.reset_distance_factor,
                );
            }
            None => {
                self.scene_extent = 0.0;
                self.state.target = Vec3::ZERO;
                self.state.distance =
                    self.options.clamp_distance(self.options.default_distance);
            }
        }
    }

    /// Ease the orbit centre to `point` (and the pan offset to zero),
    /// replacing any recentre already in flight.
    pub fn animate_to_point(&mut self, point: Vec3, now: Instant) {
        self.stop_momentum();
        let replaced = self.focus.start(FocusAnimation {
            start: now,
            duration: Duration::from_millis(self.options.focus_duration_ms),
            easing: self.options.focus_easing,
            from_target: self.state.target,
            from_position: self.state.position,
            to_target: point,
        });
        if replaced {
            log::debug!("camera recentre restarted toward {point}");
        }
    }

    /// Advance momentum and recentre animation by one frame.
    ///
    /// Returns `true` while anything moved this frame.
    pub fn tick(&mut self, now: Instant) -> bool {
        let state = &mut self.state;
        let focused = self.focus.tick(|anim| anim.step(state, now));

        let decay = self.options.momentum_decay;
        let threshold = self.options.momentum_threshold;
        let coasted = self.momentum.tick(|momentum| {
            momentum.steps += 1;
            state.velocity *= decay;
            state.position += state.velocity;
            if state.velocity.abs().max_element() < threshold {
                state.velocity = Vec3::ZERO;
                log::trace!("pan momentum settled after {} steps", momentum.steps);
                TaskStatus::Finished
            } else {
                TaskStatus::Running
            }
        });
        focused || coasted
    }

    /// Whether momentum or a recentre animation is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.momentum.is_active() || self.focus.is_active()
    }

    /// Whether a recentre animation is in flight.
    #[must_use]
    pub fn is_focusing(&self) -> bool {
        self.focus.is_active()
    }

    fn stop_momentum(&mut self) {
        self.state.velocity = Vec3::ZERO;
        let _ = self.momentum.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        CameraController::new(CameraOptions::default())
    }

    #[test]
    fn rotate_adds_scaled_delta_and_stops_momentum() {
        let mut cam = controller();
        cam.pan(Vec2::new(10.0, 0.0));
        assert!(cam.is_animating());
        cam.rotate(Vec2::new(100.0, -50.0));
        let k = cam.options().rotate_speed;
        assert!((cam.state().rotation.y - 100.0 * k).abs() < 1e-6);
        assert!((cam.state().rotation.x + 50.0 * k).abs() < 1e-6);
        assert_eq!(cam.state().velocity, Vec3::ZERO);
        assert!(!cam.is_animating());
    }

    #[test]
    fn pan_sets_velocity_not_position() {
        let mut cam = controller();
        cam.pan(Vec2::new(4.0, 2.0));
        assert_eq!(cam.state().position, Vec3::ZERO);
        let v = cam.state().velocity;
        assert!(v.x > 0.0 && v.y < 0.0 && v.z == 0.0);
    }

    #[test]
    fn pan_scales_with_distance() {
        let mut near = controller();
        near.zoom(1.0);
        let mut far = controller();
        far.zoom(-1.0);
        near.pan(Vec2::X);
        far.pan(Vec2::X);
        assert!(far.state().velocity.x > near.state().velocity.x);
    }

    #[test]
    fn momentum_terminates_at_exact_zero() {
        let mut cam = controller();
        cam.pan(Vec2::new(50.0, -30.0));
        let now = Instant::now();
        let mut steps = 0;
        while cam.tick(now) {
            steps += 1;
            assert!(steps < 1_000, "momentum did not terminate");
        }
        assert_eq!(cam.state().velocity, Vec3::ZERO);
        assert!(!cam.is_animating());
        assert!(cam.state().position.x > 0.0);
        assert_eq!(cam.state().target, Vec3::ZERO);
    }

    fn ndc_depth(cam: &CameraController, point: Vec3) -> f32 {
        let view_proj =
            cam.projection(800, 600).matrix() * cam.state().view_matrix();
        let clip = view_proj * point.extend(1.0);
        clip.z / clip.w
    }

    #[test]
    fn zoomed_out_structure_stays_inside_far_plane() {
        let mut cam = controller();
        let extent = 800.0;
        let bounds =
            Bounds::from_points([Vec3::ZERO, Vec3::new(extent, 0.0, 0.0)]).unwrap();
        cam.reset(Some(&bounds));
        for _ in 0..200 {
            cam.zoom(-1.0);
        }
        assert_eq!(cam.state().distance, cam.options().max_distance);

        let target = cam.state().target;
        let view_dir = (target - cam.state().eye()).normalize();
        for point in [target, target + view_dir * extent, target - view_dir * extent] {
            let z = ndc_depth(&cam, point);
            assert!(z > 0.0 && z < 1.0, "depth {z} clipped for {point}");
        }
    }

    #[test]
    fn far_plane_clears_max_distance_without_structure() {
        let mut cam = controller();
        for _ in 0..200 {
            cam.zoom(-1.0);
        }
        let behind = cam.state().target
            + (cam.state().target - cam.state().eye()).normalize() * 5.0;
        assert!(ndc_depth(&cam, behind) < 1.0);
    }

    #[test]
    fn zoom_is_bounded_and_monotonic() {
        let mut cam = controller();
        let mut prev = cam.state().distance;
        for _ in 0..500 {
            cam.zoom(-1.0);
            assert!(cam.state().distance >= prev);
            assert!(cam.state().distance <= cam.options().max_distance);
            prev = cam.state().distance;
        }
        assert_eq!(prev, cam.options().max_distance);
        for _ in 0..500 {
            cam.zoom(1.0);
            assert!(cam.state().distance <= prev);
            assert!(cam.state().distance >= cam.options().min_distance);
            prev = cam.state().distance;
        }
        assert_eq!(prev, cam.options().min_distance);
    }

    #[test]
    fn zero_zoom_is_noop() {
        let mut cam = controller();
        let before = cam.state().distance;
        cam.zoom(0.0);
        assert_eq!(cam.state().distance, before);
    }

    #[test]
    fn reset_to_bounds() {
        let mut cam = controller();
        cam.rotate(Vec2::new(30.0, 30.0));
        cam.pan(Vec2::new(5.0, 5.0));
        let bounds = Bounds {
            min: Vec3::new(-10.0, 0.0, 0.0),
            max: Vec3::new(10.0, 4.0, 6.0),
        };
        cam.reset(Some(&bounds));
        let s = cam.state();
        assert_eq!(s.target, Vec3::new(0.0, 2.0, 3.0));
        assert_eq!(s.position, Vec3::ZERO);
        assert_eq!(s.rotation, Vec2::ZERO);
        assert_eq!(s.velocity, Vec3::ZERO);
        assert!((s.distance - 20.0 * cam.options().reset_distance_factor).abs() < 1e-4);
        assert!(!cam.is_animating());
    }

    #[test]
    fn reset_without_bounds_uses_defaults() {
        let mut cam = controller();
        cam.zoom(-1.0);
        cam.reset(None);
        assert_eq!(cam.state().distance, cam.options().default_distance);
        assert_eq!(cam.state().target, Vec3::ZERO);
    }

    #[test]
    fn reset_cancels_recentre() {
        let mut cam = controller();
        let now = Instant::now();
        cam.animate_to_point(Vec3::new(5.0, 5.0, 5.0), now);
        cam.reset(None);
        assert!(!cam.is_focusing());
        let _ = cam.tick(now + Duration::from_secs(1));
        assert_eq!(cam.state().target, Vec3::ZERO);
    }

    #[test]
    fn recentre_eases_to_point() {
        let mut cam = controller();
        let start = Instant::now();
        let goal = Vec3::new(3.0, -4.0, 12.0);
        cam.animate_to_point(goal, start);

        assert!(cam.tick(start + Duration::from_millis(250)));
        let mid = cam.state().target;
        assert!(mid.distance(goal) > 0.0 && mid.distance(goal) < goal.length());

        assert!(cam.tick(start + Duration::from_millis(600)));
        assert_eq!(cam.state().target, goal);
        assert_eq!(cam.state().position, Vec3::ZERO);
        assert!(!cam.is_focusing());
        assert!(!cam.tick(start + Duration::from_millis(700)));
    }

    #[test]
    fn new_recentre_replaces_old() {
        let mut cam = controller();
        let start = Instant::now();
        cam.animate_to_point(Vec3::X * 10.0, start);
        let _ = cam.tick(start + Duration::from_millis(100));
        cam.animate_to_point(Vec3::Y * 10.0, start + Duration::from_millis(100));
        let _ = cam.tick(start + Duration::from_secs(2));
        assert_eq!(cam.state().target, Vec3::Y * 10.0);
    }

    #[test]
    fn recentre_zeroes_velocity_throughout() {
        let mut cam = controller();
        let start = Instant::now();
        cam.animate_to_point(Vec3::ONE, start);
        cam.pan(Vec2::new(20.0, 0.0));
        let _ = cam.tick(start + Duration::from_millis(10));
        assert_eq!(cam.state().velocity, Vec3::ZERO);
    }
}
