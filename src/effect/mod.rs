//! Interface to the procedural effect engine
//!
//! The draw loop falls back to local effects when the network goes quiet.
//! It never owns effect state; it asks the engine to render and reads back
//! what pacing needs from the current effect.

mod static_color;

use embassy_time::Instant;
pub use static_color::SolidColorEngine;

use crate::color::Rgb;

/// Fallback frame rate for effects that do not ask for one
pub const DEFAULT_EFFECT_FPS: f32 = 60.0;

pub trait EffectEngine {
    /// Number of configured effects; zero turns local drawing off
    fn effect_count(&self) -> usize;

    /// Called once when the draw loop starts
    fn start_effect(&mut self);

    /// Render the current effect into `leds` and advance its animation
    fn update(&mut self, now: Instant, leds: &mut [Rgb]);

    /// Frame rate the current effect wants to run at
    fn desired_frames_per_second(&self) -> f32 {
        DEFAULT_EFFECT_FPS
    }

    /// Whether the current effect draws each frame from scratch
    fn requires_double_buffering(&self) -> bool {
        false
    }

    /// Whether the engine finished initializing
    fn is_ready(&self) -> bool {
        true
    }
}
