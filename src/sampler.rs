//! Random sampling for particle seeding and per-tick jitter.
//!
//! All randomness in the simulation goes through a [`Sampler`], so a worker
//! thread only needs its own sampler to advance its share of the swarm.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Squared length below which a vector is treated as having no direction.
const DEGENERATE_LENGTH_SQ: f32 = 1e-12;

/// Source of uniform scalars and uniformly distributed points.
///
/// ```ignore
/// let mut sampler = Sampler::new();
/// let p = sampler.uniform_in_sphere(9.0);   // anywhere inside the ball
/// let v = sampler.uniform_in_direction();  // unit vector
/// ```
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: SmallRng,
}

impl Sampler {
    /// Create a sampler seeded from the system clock.
    ///
    /// Each program execution gets a different stream.
    pub fn new() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::from_seed(seed)
    }

    /// Create a sampler with a fixed seed for reproducible runs.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Derive an independent sampler from this one.
    ///
    /// Used to hand each worker chunk its own stream.
    pub fn fork(&mut self) -> Self {
        Self::from_seed(self.rng.gen())
    }

    // ========== Scalars ==========

    /// Uniform f32 in `[0, 1)`.
    #[inline]
    pub fn uniform_scalar(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Uniform f32 in `[-amplitude, amplitude)`.
    #[inline]
    pub fn symmetric(&mut self, amplitude: f32) -> f32 {
        (self.rng.gen::<f32>() * 2.0 - 1.0) * amplitude
    }

    /// Vector whose components are independent [`Sampler::symmetric`] draws.
    #[inline]
    pub fn symmetric_vec3(&mut self, amplitude: f32) -> Vec3 {
        Vec3::new(
            self.symmetric(amplitude),
            self.symmetric(amplitude),
            self.symmetric(amplitude),
        )
    }

    /// Bernoulli draw that succeeds with the given probability.
    #[inline]
    pub fn chance(&mut self, probability: f32) -> bool {
        self.rng.gen::<f32>() < probability
    }

    // ========== Points and directions ==========

    /// Random point inside a ball of the given radius, centered at origin.
    ///
    /// Density is uniform per unit volume: a direction is rejection-sampled
    /// from the unit cube and the radius is scaled by the cube root of a
    /// uniform draw. The radial draw is taken from `(0, 1]`, so the returned
    /// point is never exactly the origin when `radius > 0`.
    pub fn uniform_in_sphere(&mut self, radius: f32) -> Vec3 {
        let direction = self.cube_rejection_direction();
        let radial = 1.0 - self.rng.gen::<f32>();
        direction * radial.cbrt() * radius
    }

    /// Random unit vector.
    pub fn uniform_in_direction(&mut self) -> Vec3 {
        self.cube_rejection_direction()
    }

    /// Unit vector from a cube sample accepted only inside the unit ball.
    ///
    /// Samples too close to the center are rejected as well, so the
    /// normalization never divides by zero.
    fn cube_rejection_direction(&mut self) -> Vec3 {
        loop {
            let candidate = Vec3::new(
                self.symmetric(1.0),
                self.symmetric(1.0),
                self.symmetric(1.0),
            );
            let length_sq = candidate.length_squared();
            if length_sq <= 1.0 && length_sq > DEGENERATE_LENGTH_SQ {
                return candidate / length_sq.sqrt();
            }
        }
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}
