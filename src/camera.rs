//! Camera used to turn pointer coordinates into world-space rays.

use glam::{Mat4, Vec3};

/// What the ray caster needs to know about a camera.
///
/// Implement this for whatever camera the renderer owns.
pub trait CameraProjection {
    /// Camera position in world space.
    fn position(&self) -> Vec3;

    /// Combined projection * view matrix.
    fn view_projection(&self) -> Mat4;

    /// Inverse of [`CameraProjection::view_projection`], mapping NDC back to world space.
    fn inverse_view_projection(&self) -> Mat4 {
        self.view_projection().inverse()
    }
}

/// Orbit camera with a perspective projection.
///
/// The default sits at `(0, 0, 10)` looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera with default positioning.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 10.0,
            target: Vec3::ZERO,
            fov_y: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Calculate the camera's world position.
    pub fn eye(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraProjection for Camera {
    fn position(&self) -> Vec3 {
        self.eye()
    }

    fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_position() {
        let camera = Camera::new();
        assert!((camera.position() - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::new();
        let ndc = camera.view_projection().project_point3(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
    }

    #[test]
    fn test_set_viewport() {
        let mut camera = Camera::new();
        camera.set_viewport(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport(800, 0);
        assert_eq!(camera.aspect, 800.0);
    }
}
