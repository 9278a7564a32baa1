//! Per-particle force terms.
//!
//! Each function computes one contribution to a particle's velocity for a
//! single tick. [`crate::Simulation`] applies them in a fixed order; the
//! order is part of the behavior and must not be rearranged.
//!
//! # Terms
//!
//! | Term | Applies when |
//! |------|--------------|
//! | [`ray_repulsion`] | within `repulsion_radius` of the pointer ray |
//! | [`damp_and_clamp`] | always |
//! | [`anti_stall`] | speed nearly zero |
//! | [`ambient_flow`] | outside `repulsion_radius` of the ray |
//! | [`boundary_containment`] | within 2 units of the boundary |
//!
//! All distances in the ambient and boundary terms are measured from the
//! position read at the start of the tick, not the integrated one.

use crate::config::SimulationConfig;
use crate::input::PointerState;
use crate::ray::InteractionRay;
use crate::sampler::Sampler;
use glam::{Vec2, Vec3};

/// Fixed per-tick velocity damping applied by the tick.
///
/// `SimulationConfig::damping` is not read here.
pub const VELOCITY_DAMPING: f32 = 0.98;

/// Size relaxation factor toward the resting size, per tick.
pub const SIZE_RELAXATION: f32 = 0.1;

/// Squared speed under which a particle gets an anti-stall kick.
pub const STALL_SPEED_SQ: f32 = 0.00001;

/// Pointer speed above which the sweep term is added.
const SWEEP_THRESHOLD: f32 = 0.001;

/// Probability per particle per tick of a large random kick.
const RANDOM_KICK_CHANCE: f32 = 0.003;

/// Distance from the boundary where containment starts.
const BOUNDARY_ZONE: f32 = 2.0;

/// Distance from the boundary where inward jitter starts.
const BOUNDARY_JITTER_ZONE: f32 = 0.5;

/// Distances below this have no usable direction.
const MIN_DISTANCE: f32 = 1e-6;

/// Read-only inputs shared by every particle during one tick.
#[derive(Debug, Clone, Copy)]
pub struct ForceContext<'a> {
    pub ray: InteractionRay,
    pub pointer_velocity: Vec2,
    pub pointer_speed: f32,
    /// Seconds since start, drives the curl flow field.
    pub elapsed: f32,
    pub config: &'a SimulationConfig,
}

impl<'a> ForceContext<'a> {
    pub fn new(
        ray: InteractionRay,
        pointer: &PointerState,
        elapsed: f32,
        config: &'a SimulationConfig,
    ) -> Self {
        Self {
            ray,
            pointer_velocity: pointer.velocity(),
            pointer_speed: pointer.speed(),
            elapsed,
            config,
        }
    }
}

/// Result of a particle being inside the repulsion radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repulsion {
    /// Velocity to add this tick.
    pub impulse: Vec3,
    /// Normalized strength in `[0, repulsion_strength)`, drives color and size.
    pub strength: f32,
}

/// Linear falloff of the repulsion strength with distance from the ray.
///
/// `None` outside `radius`.
#[inline]
pub fn repulsion_strength(distance: f32, radius: f32, strength: f32) -> Option<f32> {
    if distance < radius && radius > 0.0 {
        Some(strength * (1.0 - distance / radius))
    } else {
        None
    }
}

/// Push away from the pointer ray.
///
/// `offset` is the perpendicular vector from the ray to the particle. A
/// particle sitting exactly on the ray gets no directional push, only the
/// sweep term.
pub fn ray_repulsion(offset: Vec3, distance: f32, ctx: &ForceContext<'_>) -> Option<Repulsion> {
    let config = ctx.config;
    let strength =
        repulsion_strength(distance, config.repulsion_radius, config.repulsion_strength)?;

    let direction = offset.normalize_or_zero();
    let mut impulse = direction * strength * (1.0 + ctx.pointer_speed * 5.0);

    if ctx.pointer_speed > SWEEP_THRESHOLD {
        let sweep = Vec3::new(ctx.pointer_velocity.x, ctx.pointer_velocity.y, 0.0)
            * (config.mouse_influence * 10.0 * strength);
        impulse += Vec3::new(sweep.x, sweep.y, sweep.z * 0.2);
    }

    Some(Repulsion { impulse, strength })
}

/// Display color of a repelled particle.
#[inline]
pub fn brighten(base: Vec3, strength: f32) -> Vec3 {
    (base * (1.0 + strength * 2.0)).min(Vec3::ONE)
}

/// Display size of a repelled particle.
#[inline]
pub fn repelled_size(particle_size: f32, strength: f32) -> f32 {
    particle_size * (1.0 + strength * 0.5)
}

/// Ease `size` toward the resting size.
#[inline]
pub fn relax_size(size: f32, particle_size: f32) -> f32 {
    size + (particle_size - size) * SIZE_RELAXATION
}

/// Speed ceiling: looser near the pointer ray, tighter elsewhere.
#[inline]
pub fn speed_limit(max_speed: f32, near_ray: bool) -> f32 {
    if near_ray {
        max_speed * 1.5
    } else {
        max_speed * 0.6
    }
}

/// Apply fixed damping, then rescale to the speed ceiling.
///
/// Returns the new velocity and the squared speed measured after damping
/// but before clamping, which is what the anti-stall check reads.
pub fn damp_and_clamp(velocity: Vec3, max_speed: f32, near_ray: bool) -> (Vec3, f32) {
    let damped = velocity * VELOCITY_DAMPING;
    let speed_sq = damped.length_squared();
    let limit = speed_limit(max_speed, near_ray);
    if speed_sq > limit * limit {
        (damped * (limit / speed_sq.sqrt()), speed_sq)
    } else {
        (damped, speed_sq)
    }
}

/// Tiny symmetric kick for particles that have nearly stopped.
pub fn anti_stall(speed_sq: f32, sampler: &mut Sampler) -> Vec3 {
    if speed_sq < STALL_SPEED_SQ {
        sampler.symmetric_vec3(0.00025)
    } else {
        Vec3::ZERO
    }
}

/// Push away from the origin, fading linearly to zero at `reach`.
pub fn outward_push(position: Vec3, distance: f32, reach: f32, gain: f32) -> Vec3 {
    if distance >= reach || distance < MIN_DISTANCE {
        return Vec3::ZERO;
    }
    position / distance * (gain * (1.0 - distance / reach))
}

/// Pseudo-curl flow field from sinusoids of position and time.
pub fn curl_flow(position: Vec3, time: f32) -> Vec3 {
    let scale = 0.4;
    let Vec3 { x, y, z } = position;
    Vec3::new(
        (y * scale + time).sin() * (z * scale + time * 0.7).cos(),
        (z * scale + time * 0.5).sin() * (x * scale + time * 0.8).cos(),
        (x * scale + time * 0.6).sin() * (y * scale + time * 0.9).cos(),
    )
}

/// Drift applied to particles away from the pointer ray.
///
/// Jitter, two center anti-clustering pushes, the curl field, and an
/// occasional larger kick, in that order.
pub fn ambient_flow(
    position: Vec3,
    distance_from_center: f32,
    ctx: &ForceContext<'_>,
    sampler: &mut Sampler,
) -> Vec3 {
    let config = ctx.config;
    let boundary = config.boundary_radius;

    let mut delta = sampler.symmetric_vec3(0.0005);
    delta += outward_push(position, distance_from_center, boundary * 0.7, 0.0006);
    delta += curl_flow(position, ctx.elapsed) * 0.0003;
    delta += outward_push(position, distance_from_center, boundary * 0.5, 0.001);

    if sampler.chance(RANDOM_KICK_CHANCE) {
        delta += sampler.symmetric_vec3(0.5) * (config.random_movement * 1.5);
    }
    delta
}

/// Soft inward force near the boundary sphere.
///
/// Grows quadratically over the last two units before `boundary_radius`.
/// Within half a unit an extra random inward jitter is added.
pub fn boundary_containment(
    position: Vec3,
    distance_from_center: f32,
    boundary_radius: f32,
    sampler: &mut Sampler,
) -> Vec3 {
    let boundary_dist = boundary_radius - distance_from_center;
    if boundary_dist >= BOUNDARY_ZONE || distance_from_center < MIN_DISTANCE {
        return Vec3::ZERO;
    }

    let inward = -position / distance_from_center;
    let falloff = 1.0 - boundary_dist / BOUNDARY_ZONE;
    let mut force = inward * (0.01 * falloff * falloff);

    if boundary_dist < BOUNDARY_JITTER_ZONE {
        force += inward
            * Vec3::new(
                sampler.uniform_scalar(),
                sampler.uniform_scalar(),
                sampler.uniform_scalar(),
            )
            * 0.01;
    }
    force
}
