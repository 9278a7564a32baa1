//! Struct-of-arrays particle storage.
//!
//! Each attribute lives in its own contiguous array and particle `i` sits at
//! index `i` of every array. The flat views returned by
//! [`ParticleStore::position_buffer`] and friends are what a renderer uploads.

use crate::config::SimulationConfig;
use crate::sampler::Sampler;
use crate::theme::ColorTheme;
use glam::Vec3;
use log::{debug, info};

/// Which render buffers changed since the last upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    pub positions: bool,
    pub colors: bool,
    pub sizes: bool,
}

impl DirtyFlags {
    /// All three buffers changed.
    pub const ALL: DirtyFlags = DirtyFlags {
        positions: true,
        colors: true,
        sizes: true,
    };

    pub fn any(&self) -> bool {
        self.positions || self.colors || self.sizes
    }
}

/// Flat, index-aligned views of the render attributes.
///
/// `positions` and `colors` hold `3 * N` floats, `sizes` holds `N`.
#[derive(Debug, Clone, Copy)]
pub struct FrameBuffers<'a> {
    pub positions: &'a [f32],
    pub colors: &'a [f32],
    pub sizes: &'a [f32],
}

impl FrameBuffers<'_> {
    /// Number of particles described by these buffers.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Consumer of per-frame particle buffers, typically a GPU uploader.
pub trait ParticleSink {
    /// Receive the current buffers. `dirty` says which ones changed.
    fn upload(&mut self, frame: &FrameBuffers<'_>, dirty: DirtyFlags);
}

/// Mutable, index-aligned slices handed to the tick.
pub(crate) struct ParticleLanes<'a> {
    pub positions: &'a mut [Vec3],
    pub velocities: &'a mut [Vec3],
    pub colors: &'a mut [Vec3],
    pub sizes: &'a mut [f32],
    pub base_colors: &'a [Vec3],
}

/// Owner of all per-particle state.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    colors: Vec<Vec3>,
    base_colors: Vec<Vec3>,
    sizes: Vec<f32>,
    color_values: Vec<f32>,
    dirty: DirtyFlags,
}

impl ParticleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `config.particle_count` particles.
    pub fn with_config(config: &SimulationConfig, sampler: &mut Sampler) -> Self {
        let mut store = Self::new();
        store.initialize(config.particle_count as usize, config, sampler);
        store
    }

    /// Reallocate and reseed every particle.
    ///
    /// Positions fill a ball of 0.9 x the boundary radius uniformly by
    /// volume. Velocities point in a random direction with a speed in
    /// `[0.001, 0.004)`. Sizes jitter in `[0.6, 1.4)` x the base size.
    pub fn initialize(&mut self, count: usize, config: &SimulationConfig, sampler: &mut Sampler) {
        self.positions.clear();
        self.velocities.clear();
        self.color_values.clear();
        self.sizes.clear();
        self.positions.reserve(count);
        self.velocities.reserve(count);
        self.color_values.reserve(count);
        self.sizes.reserve(count);

        let spawn_radius = config.boundary_radius * 0.9;
        for _ in 0..count {
            self.positions.push(sampler.uniform_in_sphere(spawn_radius));

            let speed = 0.001 + sampler.uniform_scalar() * 0.003;
            self.velocities.push(sampler.uniform_in_direction() * speed);

            self.color_values.push(sampler.uniform_scalar());
            self.sizes.push(config.particle_size * (0.6 + sampler.uniform_scalar() * 0.8));
        }

        info!(
            "Initialized {} particles within radius {:.2}",
            count, spawn_radius
        );
        self.refresh_colors(config.color_theme, config.brightness);
    }

    /// Recompute base colors from the color scalars and reset display colors.
    pub fn refresh_colors(&mut self, theme: ColorTheme, brightness: f32) {
        self.base_colors.clear();
        self.base_colors.extend(
            self.color_values
                .iter()
                .map(|&value| theme.evaluate(value, brightness)),
        );
        self.colors.clear();
        self.colors.extend_from_slice(&self.base_colors);
        self.dirty = DirtyFlags::ALL;
        debug!(
            "Refreshed {} colors ({}, brightness {:.2})",
            self.len(),
            theme.name(),
            brightness
        );
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    // ========== Per-attribute views ==========

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Display colors for the current tick.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Resting theme colors.
    pub fn base_colors(&self) -> &[Vec3] {
        &self.base_colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Per-particle color scalars, fixed at initialization.
    pub fn color_values(&self) -> &[f32] {
        &self.color_values
    }

    // ========== Render buffers ==========

    /// Positions as `3 * N` floats.
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Display colors as `3 * N` floats.
    pub fn color_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Sizes as `N` floats.
    pub fn size_buffer(&self) -> &[f32] {
        &self.sizes
    }

    pub fn frame(&self) -> FrameBuffers<'_> {
        FrameBuffers {
            positions: self.position_buffer(),
            colors: self.color_buffer(),
            sizes: self.size_buffer(),
        }
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Hand the buffers to `sink` if anything changed, then clear the flags.
    ///
    /// Returns whether an upload happened.
    pub fn present<S: ParticleSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        if !self.dirty.any() {
            return false;
        }
        let dirty = std::mem::take(&mut self.dirty);
        sink.upload(&self.frame(), dirty);
        true
    }

    // ========== Tick access ==========

    pub(crate) fn lanes_mut(&mut self) -> ParticleLanes<'_> {
        ParticleLanes {
            positions: &mut self.positions,
            velocities: &mut self.velocities,
            colors: &mut self.colors,
            sizes: &mut self.sizes,
            base_colors: &self.base_colors,
        }
    }

    pub(crate) fn mark_all_dirty(&mut self) {
        self.dirty = DirtyFlags::ALL;
    }

    /// Overwrite one particle's kinematic state.
    #[cfg(test)]
    pub(crate) fn place(&mut self, index: usize, position: Vec3, velocity: Vec3) {
        self.positions[index] = position;
        self.velocities[index] = velocity;
    }
}
