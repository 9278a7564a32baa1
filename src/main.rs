//! Headless runner: drives the swarm with a pointer circling the viewport
//! and logs swarm statistics.
//!
//! ```text
//! RUST_LOG=info swarmfield [config.json] [frames]
//! ```

use log::{info, warn};
use std::env;
use swarmfield::prelude::*;

const DEFAULT_FRAMES: u64 = 600;
const REPORT_EVERY: u64 = 60;

/// Collects per-frame statistics from the uploaded buffers.
#[derive(Default)]
struct StatsSink {
    previous: Vec<f32>,
    mean_speed: f32,
    max_radius: f32,
    uploads: u64,
}

impl ParticleSink for StatsSink {
    fn upload(&mut self, frame: &FrameBuffers<'_>, dirty: DirtyFlags) {
        self.uploads += 1;
        if !dirty.positions {
            return;
        }

        let current = frame.positions.chunks_exact(3);
        let mut max_radius = 0.0_f32;
        for p in current.clone() {
            max_radius = max_radius.max(Vec3::new(p[0], p[1], p[2]).length());
        }
        self.max_radius = max_radius;

        if self.previous.len() == frame.positions.len() && !frame.is_empty() {
            let total: f32 = current
                .zip(self.previous.chunks_exact(3))
                .map(|(a, b)| Vec3::new(a[0] - b[0], a[1] - b[1], a[2] - b[2]).length())
                .sum();
            self.mean_speed = total / frame.len() as f32;
        }

        self.previous.clear();
        self.previous.extend_from_slice(frame.positions);
    }
}

fn load_config(path: Option<String>) -> SimulationConfig {
    let Some(path) = path else {
        return SimulationConfig::default();
    };
    match SimulationConfig::load(&path) {
        Ok(config) => {
            info!("Loaded config from {}", path);
            config
        }
        Err(e) => {
            warn!("Could not load {}: {}; using defaults", path, e);
            SimulationConfig::default()
        }
    }
}

fn main() {
    pretty_env_logger::init();

    let mut args = env::args().skip(1);
    let config = load_config(args.next());
    let frames = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            warn!("Invalid frame count: {}; running {} frames", e, DEFAULT_FRAMES);
            DEFAULT_FRAMES
        }
        None => DEFAULT_FRAMES,
    };

    let mut sim = Simulation::new(config);
    let camera = Camera::new();
    let mut pointer = PointerState::new();
    let mut sink = StatsSink::default();

    info!(
        "Running {} particles for {} frames ({} theme)",
        sim.len(),
        frames,
        sim.theme().name()
    );

    for frame in 0..frames {
        let angle = frame as f32 * 0.05;
        pointer.move_to(Vec2::new(angle.cos(), angle.sin()) * 0.5);

        sim.tick(&pointer, &camera);
        sim.present(&mut sink);

        if frame % REPORT_EVERY == 0 {
            info!(
                "frame {:>5} | {:>6.1} fps | mean speed {:.4} | max radius {:.3}",
                frame,
                sim.clock().fps(),
                sink.mean_speed,
                sink.max_radius
            );
        }
    }

    info!("Done after {} uploads", sink.uploads);
}
