//! Simulation clock.
//!
//! The tick itself has no delta time: one call advances every particle by
//! one fixed step. The clock only supplies the elapsed seconds that animate
//! the curl flow field, plus frame and FPS counters for diagnostics.
//!
//! # Example
//!
//! ```ignore
//! use swarmfield::time::Clock;
//!
//! let mut clock = Clock::new();
//!
//! // Once per frame:
//! let t = clock.update();
//! log::trace!("t = {:.2}s, frame {}, {:.1} fps", t, clock.frame(), clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Elapsed-time source for the flow field.
#[derive(Debug)]
pub struct Clock {
    /// When the clock was created or last reset.
    start: Instant,
    /// Wall time of the previous update.
    last_frame: Instant,
    /// Scaled seconds since start, excluding paused spans.
    elapsed_secs: f32,
    /// Updates since start.
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    /// Wall time spent paused.
    pause_elapsed: Duration,
    /// Multiplier on elapsed time (1.0 = real time).
    time_scale: f32,
}

impl Clock {
    /// Create a clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            pause_elapsed: Duration::ZERO,
            time_scale: 1.0,
        }
    }

    /// Advance the clock. Call once per frame.
    ///
    /// Returns the elapsed seconds to feed the tick. While paused, elapsed
    /// time stands still but frames are still counted.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        self.frame_count += 1;

        if !self.paused {
            let running = now.duration_since(self.start).saturating_sub(self.pause_elapsed);
            self.elapsed_secs = running.as_secs_f32() * self.time_scale;
            self.last_frame = now;
        }

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.elapsed_secs
    }

    /// Scaled seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Updates since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed every half second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Freeze elapsed time.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after [`Clock::pause`]; the paused span is skipped.
    pub fn resume(&mut self) {
        if self.paused {
            let now = Instant::now();
            self.pause_elapsed += now.duration_since(self.last_frame);
            self.last_frame = now;
            self.paused = false;
        }
    }

    /// Set the elapsed-time multiplier. Negative values clamp to zero.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Restart from zero.
    pub fn reset(&mut self) {
        *self = Self {
            time_scale: self.time_scale,
            ..Self::new()
        };
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = Clock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_clock_update() {
        let mut clock = Clock::new();
        thread::sleep(Duration::from_millis(10));
        let t = clock.update();
        assert!(t > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_clock_pause() {
        let mut clock = Clock::new();
        clock.update();
        clock.pause();

        let before = clock.elapsed();
        thread::sleep(Duration::from_millis(10));
        clock.update();
        assert_eq!(clock.elapsed(), before);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = Clock::new();
        clock.set_time_scale(0.0);
        thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.update(), 0.0);

        clock.set_time_scale(-1.0);
        assert_eq!(clock.time_scale(), 0.0);
    }

    #[test]
    fn test_reset_keeps_scale() {
        let mut clock = Clock::new();
        clock.set_time_scale(2.0);
        clock.update();
        clock.reset();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.time_scale(), 2.0);
    }
}
