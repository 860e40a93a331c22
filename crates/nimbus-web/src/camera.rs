use glam::Vec3;
use nimbus_core::constants::{
    CAMERA_FOV_Y_DEG, CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE, CAMERA_START_DISTANCE,
};
use nimbus_core::math::{cartesian_to_spherical, spherical_to_cartesian};
use nimbus_render::FrameUniforms;

/// Keeps the camera off the poles where the up vector degenerates.
const POLAR_EPSILON: f32 = 1e-3;

/// Dolly factor per wheel notch.
const ZOOM_SCALE: f32 = 0.95;

/// Orbit camera around a target point, driven by pointer drags and the wheel.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Polar angle from +Y.
    pub phi: f32,
    /// Azimuth from +Z toward +X.
    pub theta: f32,
    pub fov_y_rad: f32,
}

impl OrbitCamera {
    /// Camera at (0, 0, 200) looking at the origin.
    pub fn new() -> Self {
        Self::looking_at(Vec3::new(0.0, 0.0, CAMERA_START_DISTANCE), Vec3::ZERO)
    }

    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let (distance, phi, theta) = cartesian_to_spherical(eye - target);
        let mut camera = Self {
            target,
            distance,
            phi,
            theta,
            fov_y_rad: CAMERA_FOV_Y_DEG.to_radians(),
        };
        camera.clamp();
        camera
    }

    pub fn eye_position(&self) -> Vec3 {
        self.target + spherical_to_cartesian(self.distance, self.phi, self.theta)
    }

    /// Rotate by a pointer drag in CSS pixels. A drag across the full
    /// viewport height turns the camera once around.
    pub fn orbit(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let scale = std::f32::consts::TAU / viewport_height.max(1.0);
        self.theta -= dx * scale;
        self.phi -= dy * scale;
        self.clamp();
    }

    /// Move the target in the view plane so the point under the cursor follows it.
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let eye = self.eye_position();
        let forward = (self.target - eye).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);

        let visible_height = 2.0 * self.distance * (self.fov_y_rad / 2.0).tan();
        let per_pixel = visible_height / viewport_height.max(1.0);
        self.target += right * (-dx * per_pixel) + up * (dy * per_pixel);
    }

    /// Positive `notches` move toward the target.
    pub fn zoom(&mut self, notches: f32) {
        self.distance *= ZOOM_SCALE.powf(notches);
        self.clamp();
    }

    pub fn to_uniforms(&self, width: u32, height: u32, time: f32) -> FrameUniforms {
        FrameUniforms::look_at(
            self.eye_position(),
            self.target,
            self.fov_y_rad,
            width,
            height,
            time,
        )
    }

    fn clamp(&mut self) {
        self.phi = self
            .phi
            .clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
        self.distance = self.distance.clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}
