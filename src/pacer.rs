//! Frame pacing.
//!
//! Portable: the pacer only computes how long to idle. The caller is
//! responsible for sleeping between ticks.
//!
//! What gets drawn decides the branch:
//! - a local effect frame sleeps out the rest of the effect's frame time
//! - a network frame (drawn or still pending) sleeps until the next buffered
//!   frame is due, never longer than a short ceiling
//! - nothing at all sleeps a minimal tick so newly due frames are noticed

use embassy_time::Duration;

use crate::effect::DEFAULT_EFFECT_FPS;

/// Default ceiling while serving network frames (1/20th second)
pub const DEFAULT_NETWORK_SLEEP_CEILING: Duration = Duration::from_millis(50);

/// Default sleep when nothing was drawn
pub const DEFAULT_IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Longest the pacer ever sleeps
pub const DEFAULT_MAX_SLEEP: Duration = Duration::from_secs(1);

/// Configuration for frame pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacerTimings {
    /// Upper bound on sleep while network frames are flowing
    pub network_sleep_ceiling: Duration,
    /// Sleep when no frame was drawn
    pub idle_sleep: Duration,
    /// Absolute cap on any sleep
    pub max_sleep: Duration,
}

impl Default for PacerTimings {
    fn default() -> Self {
        Self {
            network_sleep_ceiling: DEFAULT_NETWORK_SLEEP_CEILING,
            idle_sleep: DEFAULT_IDLE_SLEEP,
            max_sleep: DEFAULT_MAX_SLEEP,
        }
    }
}

/// What the tick produced, as far as pacing cares
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaceRequest {
    /// A local effect frame was drawn
    Local {
        /// Time spent on this tick so far
        elapsed: Duration,
        /// Frame rate the current effect asks for
        desired_fps: f32,
    },
    /// A network frame was drawn, or frames are waiting in the queues
    Network {
        /// Time until the nearest buffered frame is due, if any is buffered
        next_due: Option<Duration>,
    },
    /// Nothing drawn, nothing buffered
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceBranch {
    LocalFrame,
    NetworkFrame,
    Idle,
}

/// Result of pacing a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub branch: PaceBranch,
    /// How long to wait before the next tick (may be zero)
    pub sleep: Duration,
}

/// Picks the idle time between ticks
#[derive(Debug, Clone, Copy, Default)]
pub struct FramePacer {
    timings: PacerTimings,
}

impl FramePacer {
    pub const fn new(timings: PacerTimings) -> Self {
        Self { timings }
    }

    pub const fn timings(&self) -> PacerTimings {
        self.timings
    }

    pub fn pace(&self, request: PaceRequest) -> Pacing {
        match request {
            PaceRequest::Local {
                elapsed,
                desired_fps,
            } => {
                let minimum = frame_duration(desired_fps);
                let sleep = minimum
                    .checked_sub(elapsed)
                    .unwrap_or(Duration::from_ticks(0))
                    .min(self.timings.max_sleep);
                Pacing {
                    branch: PaceBranch::LocalFrame,
                    sleep,
                }
            }
            PaceRequest::Network { next_due } => {
                let ceiling = self
                    .timings
                    .network_sleep_ceiling
                    .min(self.timings.max_sleep);
                let sleep = next_due.map_or(ceiling, |due| due.min(ceiling));
                Pacing {
                    branch: PaceBranch::NetworkFrame,
                    sleep,
                }
            }
            PaceRequest::Idle => Pacing {
                branch: PaceBranch::Idle,
                sleep: self.timings.idle_sleep.min(self.timings.max_sleep),
            },
        }
    }
}

/// Minimum time per frame for a frame rate
///
/// Rates that are not positive and finite fall back to the default effect
/// rate.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn frame_duration(fps: f32) -> Duration {
    let fps = if fps.is_finite() && fps > 0.0 {
        fps
    } else {
        DEFAULT_EFFECT_FPS
    };
    Duration::from_micros(libm::roundf(1_000_000.0 / fps) as u64)
}
