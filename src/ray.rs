//! Pointer-to-world ray casting.
//!
//! The interaction ray starts at the camera and passes through the point
//! under the pointer. It is rebuilt every tick from the current pointer
//! position and camera; nothing about it is accumulated.
//!
//! NDC depth 0.5 is used for the unprojected point. Any depth between the
//! near and far planes yields the same direction.

use crate::camera::CameraProjection;
use glam::{Vec2, Vec3, Vec4};

/// Divisor floor for near-zero `w` and near-zero ray `z` components.
const EPSILON: f32 = 1e-6;

/// NDC depth of the point unprojected to build the ray.
const UNPROJECT_DEPTH: f32 = 0.5;

/// A world-space ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl InteractionRay {
    /// Create a ray, normalizing `direction`.
    ///
    /// A zero direction falls back to `-Z`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }

    /// Point on the (infinite) line closest to `point`.
    ///
    /// Points behind the origin project onto the backward extension.
    #[inline]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let along = (point - self.origin).dot(self.direction);
        self.origin + self.direction * along
    }

    /// Perpendicular offset from the line to `point`.
    #[inline]
    pub fn offset_to(&self, point: Vec3) -> Vec3 {
        point - self.closest_point(point)
    }

    /// Perpendicular distance from the line to `point`.
    #[inline]
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.offset_to(point).length()
    }
}

/// Build the interaction ray for a pointer at `ndc` (each axis in -1..1).
pub fn compute_interaction_ray<C: CameraProjection + ?Sized>(
    ndc: Vec2,
    camera: &C,
) -> InteractionRay {
    let origin = camera.position();
    let direction = unproject(ndc, camera)
        .map(|point| point - origin)
        .and_then(Vec3::try_normalize)
        .unwrap_or(Vec3::NEG_Z);
    InteractionRay { origin, direction }
}

/// World point under the pointer where the interaction ray reaches `z = depth`.
///
/// For rays nearly parallel to the XY plane the z-component is floored at a
/// small epsilon, so the result is far away but finite.
pub fn unproject_to_world_at_depth<C: CameraProjection + ?Sized>(
    ndc: Vec2,
    depth: f32,
    camera: &C,
) -> Vec3 {
    let ray = compute_interaction_ray(ndc, camera);
    let dz = if ray.direction.z.abs() < EPSILON {
        EPSILON.copysign(ray.direction.z)
    } else {
        ray.direction.z
    };
    let distance = (depth - ray.origin.z) / dz;
    ray.origin + ray.direction * distance
}

/// Points under the pointer five units in front of and behind the camera plane.
pub fn interaction_depth_points<C: CameraProjection + ?Sized>(
    ndc: Vec2,
    camera: &C,
) -> (Vec3, Vec3) {
    let camera_z = camera.position().z;
    (
        unproject_to_world_at_depth(ndc, camera_z - 5.0, camera),
        unproject_to_world_at_depth(ndc, camera_z + 5.0, camera),
    )
}

/// Map an NDC point back to world space, or `None` if it lands at infinity.
fn unproject<C: CameraProjection + ?Sized>(ndc: Vec2, camera: &C) -> Option<Vec3> {
    let world = camera.inverse_view_projection() * Vec4::new(ndc.x, ndc.y, UNPROJECT_DEPTH, 1.0);
    if world.w.abs() < EPSILON || !world.is_finite() {
        return None;
    }
    Some(world.truncate() / world.w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::new();
        let ray = compute_interaction_ray(Vec2::ZERO, &camera);
        assert!((ray.origin - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_off_center_ray_leans_toward_pointer() {
        let camera = Camera::new();
        let ray = compute_interaction_ray(Vec2::new(0.5, -0.5), &camera);
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.y < 0.0);
        assert!((ray.direction.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_distance_to_ray() {
        let ray = InteractionRay::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -2.0));
        assert!((ray.distance_to(Vec3::new(3.0, 4.0, 0.0)) - 5.0).abs() < 1e-5);
        // Behind the origin still measures against the line.
        assert!((ray.distance_to(Vec3::new(1.0, 0.0, 20.0)) - 1.0).abs() < 1e-5);
        assert!((ray.closest_point(Vec3::new(3.0, 4.0, 0.0)) - Vec3::ZERO).length() < 1e-5);
    }

    #[test]
    fn test_zero_direction_falls_back() {
        let ray = InteractionRay::new(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(ray.direction, Vec3::NEG_Z);
    }

    #[test]
    fn test_unproject_at_depth_hits_plane() {
        let camera = Camera::new();
        let p = unproject_to_world_at_depth(Vec2::new(0.3, 0.2), 0.0, &camera);
        assert!(p.z.abs() < 1e-3);
        let center = unproject_to_world_at_depth(Vec2::ZERO, 0.0, &camera);
        assert!(center.length() < 1e-3);
    }

    #[test]
    fn test_depth_points() {
        let camera = Camera::new();
        let (near, far) = interaction_depth_points(Vec2::ZERO, &camera);
        assert!((near.z - 5.0).abs() < 1e-3);
        assert!((far.z - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_parallel_ray_stays_finite() {
        // Looking down -X: the center ray has no z component.
        let camera = Camera {
            yaw: FRAC_PI_2,
            ..Camera::new()
        };
        let p = unproject_to_world_at_depth(Vec2::ZERO, 0.0, &camera);
        assert!(p.is_finite());
    }
}
