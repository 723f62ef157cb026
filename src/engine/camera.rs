// Perspective camera + damped orbit controller.
//
// Camera model:
//   - The eye sits on a sphere around a fixed target (the sun at the origin)
//   - Left-drag rotates around the target (azimuth theta, polar angle phi)
//   - Mouse wheel dollies toward / away from the target
//   - Rotation has inertia: input accumulates into a pending delta that
//     update() bleeds off by `damping_factor` each frame

use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};
use super::input::InputState;

pub const FOV_Y_DEGREES: f32 = 55.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;
pub const INITIAL_EYE: Vec3 = Vec3::new(0.0, 12.0, 26.0);
pub const DAMPING_FACTOR: f32 = 0.06;

// Keeps the eye off the poles so look_at never degenerates.
const PHI_EPSILON: f32 = 1e-6;

// ============================================================================
// PERSPECTIVE CAMERA
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y: FOV_Y_DEGREES.to_radians(),
            aspect,
            near: NEAR,
            far: FAR,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// World-space width of a distance-attenuated point of size 1.
    ///
    /// A point of size `s` covers `s * (height / 2) / depth` pixels, the
    /// same as a quad `s * tan(fov_y / 2)` units wide at that depth.
    pub fn point_scale(&self) -> f32 {
        (self.fov_y * 0.5).tan()
    }
}

// ============================================================================
// ORBIT CONTROLLER
// ============================================================================

pub struct OrbitController {
    target: Vec3,

    /// Distance from target to eye.
    radius: f32,
    /// Azimuth around +Y, 0 = eye on +Z.
    theta: f32,
    /// Polar angle from +Y, clamped to (0, PI).
    phi: f32,

    /// Rotation still to be applied, bled off by update().
    pending_theta: f32,
    pending_phi: f32,
    /// Multiplicative dolly requested since the last update().
    pending_scale: f32,

    pub damping_factor: f32,
    /// Full-height drag = one full turn at 1.0.
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitController {
    /// Controller looking at `target` from `eye`.
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length();
        let (theta, phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI / 2.0)
        };

        Self {
            target,
            radius,
            theta,
            phi,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
            damping_factor: DAMPING_FACTOR,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 4.0,
            max_distance: 400.0,
        }
    }

    /// Feed this frame's drag and scroll. `viewport_height` is in the same
    /// units as the mouse delta (physical pixels).
    pub fn apply_input(&mut self, input: &InputState, viewport_height: f32) {
        if input.is_dragging() && viewport_height > 0.0 {
            let (dx, dy) = input.mouse_delta;
            self.rotate_left(TAU * dx / viewport_height * self.rotate_speed);
            self.rotate_up(TAU * dy / viewport_height * self.rotate_speed);
        }

        if input.scroll_delta != 0.0 {
            // Scroll up (positive) dollies in.
            self.pending_scale *= 0.95_f32.powf(input.scroll_delta * self.zoom_speed);
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.pending_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.pending_phi -= angle;
    }

    /// Advance the damped state by one frame. Returns true if the eye moved.
    pub fn update(&mut self) -> bool {
        let before = (self.theta, self.phi, self.radius);

        self.theta += self.pending_theta * self.damping_factor;
        self.phi += self.pending_phi * self.damping_factor;
        self.phi = self.phi.clamp(PHI_EPSILON, PI - PHI_EPSILON);

        self.radius = (self.radius * self.pending_scale).clamp(self.min_distance, self.max_distance);
        self.pending_scale = 1.0;

        self.pending_theta *= 1.0 - self.damping_factor;
        self.pending_phi *= 1.0 - self.damping_factor;

        before != (self.theta, self.phi, self.radius)
    }

    /// World-space position of the camera eye.
    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target + Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn distance(&self) -> f32 { self.radius }

    #[cfg(test)]
    pub fn azimuth(&self) -> f32 { self.theta }

    #[cfg(test)]
    pub fn polar(&self) -> f32 { self.phi }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "{a} != {b}");
    }

    #[test]
    fn starts_at_initial_eye() {
        let c = OrbitController::new(INITIAL_EYE, Vec3::ZERO);
        let eye = c.eye();
        assert_close(eye.x, 0.0);
        assert_close(eye.y, 12.0);
        assert_close(eye.z, 26.0);
        assert_close(c.distance(), 820.0_f32.sqrt());
        assert_close(c.damping_factor, 0.06);
    }

    #[test]
    fn attenuated_point_matches_projected_quad() {
        let camera = PerspectiveCamera::new(16.0 / 9.0);
        // Size-1.2 stars come out roughly 0.62 world units wide.
        assert_close(1.2 * camera.point_scale(), 0.6247);

        // A quad that wide at depth 50 spans 1.2 * (h/2) / 50 pixels.
        let height = 720.0;
        let quad = 1.2 * camera.point_scale();
        let ndc = camera.projection_matrix().project_point3(Vec3::new(0.0, quad, -50.0)).y;
        assert_close(ndc * height / 2.0, 1.2 * (height / 2.0) / 50.0);
    }

    #[test]
    fn idle_update_does_not_move() {
        let mut c = OrbitController::new(INITIAL_EYE, Vec3::ZERO);
        assert!(!c.update());
        assert_close(c.eye().z, 26.0);
    }

    #[test]
    fn rotation_is_applied_gradually_and_converges() {
        let mut c = OrbitController::new(INITIAL_EYE, Vec3::ZERO);
        c.rotate_left(-0.5);

        assert!(c.update());
        // First frame applies only damping_factor of the delta.
        assert_close(c.azimuth(), 0.5 * 0.06);

        for _ in 0..500 {
            c.update();
        }
        assert_close(c.azimuth(), 0.5);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut c = OrbitController::new(INITIAL_EYE, Vec3::ZERO);
        c.rotate_up(100.0);
        for _ in 0..500 {
            c.update();
        }
        assert!(c.polar() > 0.0);
        assert!(c.eye().is_finite());
    }

    #[test]
    fn radius_is_preserved_by_rotation() {
        let mut c = OrbitController::new(INITIAL_EYE, Vec3::ZERO);
        c.rotate_left(1.0);
        c.rotate_up(0.3);
        for _ in 0..50 {
            c.update();
        }
        assert_close(c.eye().length(), 820.0_f32.sqrt());
    }

    #[test]
    fn scroll_dollies_in() {
        let mut c = OrbitController::new(INITIAL_EYE, Vec3::ZERO);
        let mut input = InputState::new();
        input.scroll_delta = 1.0;
        let before = c.distance();
        c.apply_input(&input, 600.0);
        c.update();
        assert_close(c.distance(), before * 0.95);
    }

    #[test]
    fn drag_only_rotates_while_held() {
        let mut c = OrbitController::new(INITIAL_EYE, Vec3::ZERO);
        let mut input = InputState::new();
        input.mouse_delta = (300.0, 0.0);
        c.apply_input(&input, 600.0);
        assert!(!c.update());

        input.set_dragging(true);
        c.apply_input(&input, 600.0);
        for _ in 0..500 {
            c.update();
        }
        // Half the viewport height dragged = half a turn.
        assert_close(c.azimuth(), -PI);
    }

    #[test]
    fn projection_uses_aspect() {
        let cam = PerspectiveCamera::new(800.0 / 600.0);
        assert_close(cam.fov_y, 55.0_f32.to_radians());
        let p = cam.projection_matrix();
        // x scale = y scale / aspect
        assert_close(p.x_axis.x, p.y_axis.y / (800.0 / 600.0));
    }
}
