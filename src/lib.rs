//! # Swarmfield - interactive particle swarm
//!
//! A CPU particle simulation where a swarm drifts inside a soft spherical
//! boundary and scatters away from a ray cast from the camera through the
//! pointer.
//!
//! The crate owns the simulation state and the per-frame tick. Rendering is
//! left to the host: after each tick the flat position, color and size
//! buffers are handed to a [`ParticleSink`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use swarmfield::prelude::*;
//!
//! let mut sim = Simulation::new(SimulationConfig::default());
//! let camera = Camera::new();
//! let mut pointer = PointerState::new();
//!
//! loop {
//!     pointer.move_to(cursor_ndc());
//!     sim.tick(&pointer, &camera);
//!     sim.present(&mut renderer);
//! }
//! ```
//!
//! ## Per-particle tick
//!
//! Every tick, each particle in order:
//!
//! 1. Resets its display color to its base color.
//! 2. Is repelled if within `repulsion_radius` of the interaction ray
//!    (brightening and growing), otherwise eases its size back to rest.
//! 3. Moves by its velocity.
//! 4. Has its velocity damped and clamped; the limit is higher near the ray.
//! 5. Gets a small random kick if it has nearly stopped.
//! 6. Drifts with the ambient flow when it was not repelled.
//! 7. Is pushed back inward near the boundary.
//!
//! There is no delta time. One tick is one step.
//!
//! ## Themes
//!
//! Each particle carries a fixed color scalar in `[0, 1)`. A [`ColorTheme`]
//! maps that scalar to RGB; switching themes recolors the swarm without
//! changing which particle is which shade.
//!
//! ## Features
//!
//! - `parallel`: run the tick across threads with rayon.
//! - `winit`: [`PointerState::handle_event`] for raw window events.

pub mod camera;
pub mod config;
pub mod error;
pub mod forces;
pub mod input;
pub mod ray;
pub mod sampler;
mod simulation;
pub mod store;
pub mod theme;
pub mod time;

pub use bytemuck;
pub use camera::{Camera, CameraProjection};
pub use config::{ConfigChange, ControlFolder, ControlSpec, SimulationConfig, CONTROLS};
pub use error::ConfigError;
pub use glam::{Vec2, Vec3};
pub use input::PointerState;
pub use ray::{
    compute_interaction_ray, interaction_depth_points, unproject_to_world_at_depth, InteractionRay,
};
pub use sampler::Sampler;
pub use simulation::Simulation;
pub use store::{DirtyFlags, FrameBuffers, ParticleSink, ParticleStore};
pub use theme::{BloomSettings, ColorTheme};
pub use time::Clock;

/// Convenient re-exports for typical usage.
pub mod prelude {
    pub use crate::camera::{Camera, CameraProjection};
    pub use crate::config::{ConfigChange, SimulationConfig};
    pub use crate::error::ConfigError;
    pub use crate::input::PointerState;
    pub use crate::ray::{compute_interaction_ray, InteractionRay};
    pub use crate::simulation::Simulation;
    pub use crate::store::{DirtyFlags, FrameBuffers, ParticleSink};
    pub use crate::theme::ColorTheme;
    pub use crate::time::Clock;
    pub use crate::{Vec2, Vec3};
}
