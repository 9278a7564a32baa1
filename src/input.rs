//! Pointer state consumed by the simulation.
//!
//! The input layer writes pointer moves as they arrive; the simulation reads
//! the state once per tick.
//!
//! # Usage
//!
//! ```ignore
//! let mut pointer = PointerState::new();
//! pointer.move_to_screen(400.0, 300.0, 800, 600); // center of the window
//! sim.tick(&pointer, &camera);
//! ```
//!
//! With the `winit` feature, [`PointerState::handle_event`] does this from
//! raw window events.

use glam::Vec2;

/// Pointer position and motion in normalized device coordinates.
///
/// NDC origin is the center of the viewport; X increases to the right and
/// Y increases upward, both in -1..1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    ndc: Vec2,
    previous_ndc: Vec2,
    velocity: Vec2,
    speed: f32,
    pressed: bool,

    // Window size for NDC calculation
    window_size: (u32, u32),
}

impl PointerState {
    /// Create a pointer at the center of an 800x600 viewport.
    pub fn new() -> Self {
        Self {
            ndc: Vec2::ZERO,
            previous_ndc: Vec2::ZERO,
            velocity: Vec2::ZERO,
            speed: 0.0,
            pressed: false,
            window_size: (800, 600),
        }
    }

    // ========== Queries ==========

    /// Current position in NDC.
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    /// Position before the last move.
    pub fn previous_ndc(&self) -> Vec2 {
        self.previous_ndc
    }

    /// NDC delta of the last move.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Length of [`PointerState::velocity`].
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Whether a button or touch is down. Not used by the force model.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    // ========== Updates ==========

    /// Move the pointer to an NDC position, deriving velocity and speed.
    pub fn move_to(&mut self, ndc: Vec2) {
        if !ndc.is_finite() {
            return;
        }
        self.previous_ndc = self.ndc;
        self.ndc = ndc;
        self.velocity = self.ndc - self.previous_ndc;
        self.speed = self.velocity.length();
    }

    /// Move the pointer to a pixel position inside a `width` x `height` viewport.
    pub fn move_to_screen(&mut self, x: f32, y: f32, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.move_to(Vec2::new(
            (x / width as f32) * 2.0 - 1.0,
            1.0 - (y / height as f32) * 2.0, // Y flipped
        ));
    }

    /// Clear velocity and speed while keeping the position.
    ///
    /// Call when the pointer has not moved for a frame.
    pub fn settle(&mut self) {
        self.previous_ndc = self.ndc;
        self.velocity = Vec2::ZERO;
        self.speed = 0.0;
    }

    pub fn press(&mut self) {
        self.pressed = true;
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Viewport size used to convert window events to NDC.
    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Process a winit window event.
    #[cfg(feature = "winit")]
    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) {
        use winit::event::{ElementState, TouchPhase, WindowEvent};

        let (w, h) = self.window_size;
        match event {
            WindowEvent::Resized(size) => self.set_window_size(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => {
                self.move_to_screen(position.x as f32, position.y as f32, w, h);
            }
            WindowEvent::MouseInput { state, .. } => match state {
                ElementState::Pressed => self.press(),
                ElementState::Released => self.release(),
            },
            WindowEvent::Touch(touch) => match touch.phase {
                TouchPhase::Started => self.press(),
                TouchPhase::Moved => {
                    self.move_to_screen(touch.location.x as f32, touch.location.y as f32, w, h)
                }
                TouchPhase::Ended | TouchPhase::Cancelled => self.release(),
            },
            _ => {}
        }
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}
