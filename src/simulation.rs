//! Simulation owner and the per-frame tick.

use crate::camera::CameraProjection;
use crate::config::{ConfigChange, SimulationConfig};
use crate::error::ConfigError;
use crate::forces::{self, ForceContext};
use crate::input::PointerState;
use crate::ray::{self, InteractionRay};
use crate::sampler::Sampler;
use crate::store::{ParticleLanes, ParticleSink, ParticleStore};
use crate::theme::ColorTheme;
use crate::time::Clock;
use glam::Vec3;
use log::{debug, trace};

/// Particles per worker chunk in the parallel tick.
#[cfg(feature = "parallel")]
const PARALLEL_CHUNK: usize = 4096;

/// A particle swarm and everything needed to advance it.
///
/// One call to a `tick` method advances every particle by one fixed step;
/// there is no delta time, so the swarm moves faster at higher frame rates.
///
/// ```ignore
/// let mut sim = Simulation::new(SimulationConfig::default());
/// let camera = Camera::new();
/// let mut pointer = PointerState::new();
///
/// // Every frame:
/// pointer.move_to(cursor_ndc);
/// sim.tick(&pointer, &camera);
/// sim.present(&mut gpu_uploader);
/// ```
pub struct Simulation {
    config: SimulationConfig,
    store: ParticleStore,
    sampler: Sampler,
    clock: Clock,
}

impl Simulation {
    /// Create and seed a simulation. The configuration is sanitized first.
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_sampler(config, Sampler::new())
    }

    /// Create a simulation with a fixed RNG seed.
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        Self::with_sampler(config, Sampler::from_seed(seed))
    }

    fn with_sampler(config: SimulationConfig, mut sampler: Sampler) -> Self {
        let config = config.sanitized();
        let store = ParticleStore::with_config(&config, &mut sampler);
        Self {
            config,
            store,
            sampler,
            clock: Clock::new(),
        }
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Theme currently applied to the particles.
    pub fn theme(&self) -> ColorTheme {
        self.config.color_theme
    }

    // ========== Configuration ==========

    /// Reseed every particle from the current configuration.
    pub fn reset(&mut self) {
        self.store.initialize(
            self.config.particle_count as usize,
            &self.config,
            &mut self.sampler,
        );
    }

    /// Replace the whole configuration, doing whatever the differences require.
    pub fn set_config(&mut self, config: SimulationConfig) {
        let config = config.sanitized();
        let reinitialize = config.particle_count != self.config.particle_count
            || config.particle_size != self.config.particle_size;
        let recolor = config.color_theme != self.config.color_theme
            || config.brightness != self.config.brightness;
        self.config = config;

        if reinitialize {
            self.reset();
        } else if recolor {
            self.refresh_colors();
        }
    }

    /// Edit one numeric control by name.
    pub fn set_control(&mut self, name: &str, value: f32) -> Result<ConfigChange, ConfigError> {
        let change = self.config.set_control(name, value)?;
        self.apply(change);
        Ok(change)
    }

    /// Switch color theme and recolor the swarm.
    ///
    /// The returned [`ConfigChange::Theme`] tells the host to re-read the
    /// theme's background and bloom settings.
    pub fn set_theme(&mut self, theme: ColorTheme) -> ConfigChange {
        let change = self.config.set_theme(theme);
        self.apply(change);
        change
    }

    fn apply(&mut self, change: ConfigChange) {
        match change {
            ConfigChange::Reinitialize => self.reset(),
            ConfigChange::Colors | ConfigChange::Theme => self.refresh_colors(),
            ConfigChange::Physics | ConfigChange::Bloom => {}
        }
    }

    fn refresh_colors(&mut self) {
        self.store.refresh_colors(self.config.color_theme, self.config.brightness);
    }

    // ========== Ticking ==========

    /// Advance one step using the built-in clock for the flow field.
    ///
    /// Returns the interaction ray used for this tick.
    pub fn tick<C: CameraProjection + ?Sized>(
        &mut self,
        pointer: &PointerState,
        camera: &C,
    ) -> InteractionRay {
        let elapsed = self.clock.update();
        self.tick_at(pointer, camera, elapsed)
    }

    /// Advance one step with an explicit flow-field time in seconds.
    pub fn tick_at<C: CameraProjection + ?Sized>(
        &mut self,
        pointer: &PointerState,
        camera: &C,
        elapsed: f32,
    ) -> InteractionRay {
        let ray = ray::compute_interaction_ray(pointer.ndc(), camera);
        self.tick_with_ray(ray, pointer, elapsed);
        ray
    }

    /// Advance one step against an already computed interaction ray.
    pub fn tick_with_ray(&mut self, ray: InteractionRay, pointer: &PointerState, elapsed: f32) {
        let ctx = ForceContext::new(ray, pointer, elapsed, &self.config);
        let lanes = self.store.lanes_mut();

        #[cfg(feature = "parallel")]
        advance_parallel(lanes, &ctx, &mut self.sampler);
        #[cfg(not(feature = "parallel"))]
        advance_lanes(lanes, &ctx, &mut self.sampler);

        self.store.mark_all_dirty();
        trace!(
            "Ticked {} particles at t = {:.3}s (pointer speed {:.4})",
            self.store.len(),
            elapsed,
            pointer.speed()
        );
    }

    /// Hand the render buffers to `sink` if they changed since the last call.
    pub fn present<S: ParticleSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        let uploaded = self.store.present(sink);
        if uploaded {
            debug!("Uploaded {} particles", self.store.len());
        }
        uploaded
    }
}

/// Advance every particle in `lanes` by one step.
fn advance_lanes(lanes: ParticleLanes<'_>, ctx: &ForceContext<'_>, sampler: &mut Sampler) {
    let ParticleLanes {
        positions,
        velocities,
        colors,
        sizes,
        base_colors,
    } = lanes;

    let particles = positions
        .iter_mut()
        .zip(velocities.iter_mut())
        .zip(colors.iter_mut())
        .zip(sizes.iter_mut())
        .zip(base_colors.iter());
    for ((((position, velocity), color), size), &base_color) in particles {
        advance_particle(position, velocity, color, size, base_color, ctx, sampler);
    }
}

/// Split the lanes into aligned chunks, each with its own RNG stream.
#[cfg(feature = "parallel")]
fn advance_parallel(lanes: ParticleLanes<'_>, ctx: &ForceContext<'_>, sampler: &mut Sampler) {
    use rayon::prelude::*;

    let chunk_count = lanes.positions.len().div_ceil(PARALLEL_CHUNK);
    let samplers: Vec<Sampler> = (0..chunk_count).map(|_| sampler.fork()).collect();

    lanes
        .positions
        .par_chunks_mut(PARALLEL_CHUNK)
        .zip(lanes.velocities.par_chunks_mut(PARALLEL_CHUNK))
        .zip(lanes.colors.par_chunks_mut(PARALLEL_CHUNK))
        .zip(lanes.sizes.par_chunks_mut(PARALLEL_CHUNK))
        .zip(lanes.base_colors.par_chunks(PARALLEL_CHUNK))
        .zip(samplers)
        .for_each(
            |(((((positions, velocities), colors), sizes), base_colors), mut chunk_sampler)| {
                let chunk = ParticleLanes {
                    positions,
                    velocities,
                    colors,
                    sizes,
                    base_colors,
                };
                advance_lanes(chunk, ctx, &mut chunk_sampler);
            },
        );
}

/// One tick for one particle.
///
/// Steps, in order: reset color, ray repulsion (or size relaxation),
/// integrate, damp and clamp, anti-stall, ambient flow when not repelled,
/// boundary containment. Distances for the last two use the position read
/// before integration.
fn advance_particle(
    position: &mut Vec3,
    velocity: &mut Vec3,
    color: &mut Vec3,
    size: &mut f32,
    base_color: Vec3,
    ctx: &ForceContext<'_>,
    sampler: &mut Sampler,
) {
    let config = ctx.config;
    let start = *position;

    *color = base_color;

    let offset = ctx.ray.offset_to(start);
    let distance_to_ray = offset.length();
    let repulsion = forces::ray_repulsion(offset, distance_to_ray, ctx);
    match repulsion {
        Some(r) => {
            *velocity += r.impulse;
            *color = forces::brighten(base_color, r.strength);
            *size = forces::repelled_size(config.particle_size, r.strength);
        }
        None => *size = forces::relax_size(*size, config.particle_size),
    }

    *position += *velocity;

    let near_ray = distance_to_ray < config.repulsion_radius * 1.5;
    let (damped, speed_sq) = forces::damp_and_clamp(*velocity, config.max_speed, near_ray);
    *velocity = damped + forces::anti_stall(speed_sq, sampler);

    let distance_from_center = start.length();
    if repulsion.is_none() {
        *velocity += forces::ambient_flow(start, distance_from_center, ctx, sampler);
    }
    *velocity += forces::boundary_containment(
        start,
        distance_from_center,
        config.boundary_radius,
        sampler,
    );
}
