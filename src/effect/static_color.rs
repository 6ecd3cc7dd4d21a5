//! Static color fill engine
//!
//! Fills all LEDs with a single solid color. Useful for bring-up, and as the
//! fallback when no richer engine is wired in.

use embassy_time::Instant;

use super::{DEFAULT_EFFECT_FPS, EffectEngine};
use crate::color::Rgb;

/// Engine with one effect that fills every LED with one color
#[derive(Debug, Clone)]
pub struct SolidColorEngine {
    color: Rgb,
    fps: f32,
    started: bool,
}

impl SolidColorEngine {
    pub const fn new(color: Rgb) -> Self {
        Self {
            color,
            fps: DEFAULT_EFFECT_FPS,
            started: false,
        }
    }

    /// Set the frame rate the effect asks for
    #[must_use]
    pub const fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub const fn is_started(&self) -> bool {
        self.started
    }
}

impl EffectEngine for SolidColorEngine {
    fn effect_count(&self) -> usize {
        1
    }

    fn start_effect(&mut self) {
        self.started = true;
    }

    fn update(&mut self, _now: Instant, leds: &mut [Rgb]) {
        leds.fill(self.color);
    }

    fn desired_frames_per_second(&self) -> f32 {
        self.fps
    }
}
