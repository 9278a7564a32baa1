//! Integration tests for swarm behavior through the public API.

use swarmfield::forces;
use swarmfield::prelude::*;
use swarmfield::Sampler;

fn config(count: u32) -> SimulationConfig {
    SimulationConfig {
        particle_count: count,
        boundary_radius: 10.0,
        ..Default::default()
    }
}

fn assert_finite(sim: &Simulation, tick: usize) {
    let store = sim.store();
    let vectors = store
        .positions()
        .iter()
        .chain(store.velocities())
        .chain(store.colors());
    for v in vectors {
        assert!(v.is_finite(), "tick {}: non-finite vector {:?}", tick, v);
    }
    for &s in store.sizes() {
        assert!(s.is_finite(), "tick {}: non-finite size {}", tick, s);
    }
}

fn run_with_random_pointer(ticks: usize) {
    let mut sim = Simulation::with_seed(config(1000), 42);
    let camera = Camera::new();
    let mut pointer = PointerState::new();
    let mut rng = Sampler::from_seed(7);

    for tick in 0..ticks {
        if rng.chance(0.5) {
            pointer.move_to(Vec2::new(rng.symmetric(1.0), rng.symmetric(1.0)));
        } else {
            pointer.settle();
        }
        sim.tick_at(&pointer, &camera, tick as f32 / 60.0);
        if tick % 100 == 0 {
            assert_finite(&sim, tick);
        }
    }
    assert_finite(&sim, ticks);
}

// ============================================================================
// Sampling
// ============================================================================

#[test]
fn test_sphere_sampling_is_volumetric() {
    let mut sampler = Sampler::from_seed(1);
    let radius = 4.0;
    let n = 20_000;

    // Fraction of samples per radial shell, against r^3 / R^3.
    let edges = [0.0_f32, 0.25, 0.5, 0.75, 1.0];
    let mut counts = [0usize; 4];
    for _ in 0..n {
        let r = sampler.uniform_in_sphere(radius).length() / radius;
        assert!(r <= 1.0 + 1e-5);
        let bin = ((r * 4.0) as usize).min(3);
        counts[bin] += 1;
    }

    for (i, &count) in counts.iter().enumerate() {
        let expected = edges[i + 1].powi(3) - edges[i].powi(3);
        let observed = count as f32 / n as f32;
        assert!(
            (observed - expected).abs() < 0.015,
            "shell {}: observed {}, expected {}",
            i,
            observed,
            expected
        );
    }
}

#[test]
fn test_reset_fills_inner_sphere() {
    let mut sim = Simulation::with_seed(config(1000), 3);
    sim.reset();
    assert_eq!(sim.len(), 1000);
    for p in sim.store().positions() {
        let r = p.length();
        assert!(r <= 9.0 + 1e-4, "radius {}", r);
        assert!(r > 0.0);
    }
}

// ============================================================================
// Colors
// ============================================================================

#[test]
fn test_theme_switch_scenario() {
    let ember = ColorTheme::Ember.evaluate(0.5, 1.0);
    assert!((ember - Vec3::new(0.75, 0.35, 0.15)).length() < 1e-6);
    let mono = ColorTheme::Monochrome.evaluate(0.5, 1.0);
    assert!((mono - Vec3::splat(0.65)).length() < 1e-6);

    let mut sim = Simulation::with_seed(
        SimulationConfig {
            brightness: 1.0,
            ..config(100)
        },
        4,
    );
    let scalars = sim.store().color_values().to_vec();

    assert_eq!(sim.set_theme(ColorTheme::Monochrome), ConfigChange::Theme);

    assert_eq!(sim.store().color_values(), &scalars[..]);
    for (base, &v) in sim.store().base_colors().iter().zip(&scalars) {
        assert_eq!(*base, Vec3::splat(0.3 + 0.7 * v));
    }
    assert_eq!(sim.store().colors(), sim.store().base_colors());
}

#[test]
fn test_color_scalars_survive_ticks_and_themes() {
    let mut sim = Simulation::with_seed(config(500), 5);
    let camera = Camera::new();
    let mut pointer = PointerState::new();
    let scalars = sim.store().color_values().to_vec();

    for (i, theme) in ColorTheme::ALL.iter().cycle().take(12).enumerate() {
        pointer.move_to(Vec2::new((i as f32 * 0.3).sin(), 0.0));
        for t in 0..10 {
            sim.tick_at(&pointer, &camera, t as f32);
        }
        sim.set_theme(*theme);
        assert_eq!(sim.store().color_values(), &scalars[..]);
    }
}

// ============================================================================
// Forces
// ============================================================================

#[test]
fn test_repulsion_is_stronger_closer_to_ray() {
    let radius = 3.0;
    let mut previous = f32::INFINITY;
    for step in 0..30 {
        let d = step as f32 * 0.1;
        let s = forces::repulsion_strength(d, radius, 0.5).unwrap();
        assert!(s < previous, "d = {}", d);
        previous = s;
    }
    assert!(forces::repulsion_strength(radius, radius, 0.5).is_none());
}

#[test]
fn test_speed_clamp_applies_after_damping() {
    let (v, speed_sq) = forces::damp_and_clamp(Vec3::new(10.0, 0.0, 0.0), 0.1, false);
    assert!(v.length() <= 0.1 * 0.6 + 1e-6);
    assert!((speed_sq - 9.8 * 9.8).abs() < 1e-3);
}

#[test]
fn test_swarm_stays_inside_boundary() {
    let mut sim = Simulation::with_seed(config(2000), 6);
    let far_away = InteractionRay::new(Vec3::new(0.0, 1000.0, 1000.0), Vec3::X);
    let pointer = PointerState::new();

    for tick in 0..1000 {
        sim.tick_with_ray(far_away, &pointer, tick as f32 / 60.0);
    }
    for p in sim.store().positions() {
        assert!(p.length() <= 10.0 + 0.1, "radius {}", p.length());
    }
}

// ============================================================================
// Long runs
// ============================================================================

#[test]
fn test_no_nan_with_random_pointer() {
    run_with_random_pointer(2_000);
}

#[test]
#[ignore = "100k ticks; run with --ignored"]
fn test_no_nan_with_random_pointer_long() {
    run_with_random_pointer(100_000);
}
