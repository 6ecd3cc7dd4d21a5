//! Draw-loop time keeping.
//!
//! Two kinds of time meet here. Monotonic [`Instant`]s drive pacing and
//! frame deltas, while frame timestamps are wall-clock values that only mean
//! something once a time-sync collaborator has set the [`WallClock`].

use core::cell::Cell;

use critical_section::Mutex;
use embassy_time::{Duration, Instant};

use crate::timestamp::Timestamp;

/// Source of monotonic time for the draw loop
pub trait TimeSource {
    fn now(&self) -> Instant;
}

/// Reads the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Process-wide wall-clock reference.
///
/// Holds the wall-clock value (in microseconds) that corresponds to
/// `Instant` zero. Until [`WallClock::synchronize`] is called the offset is
/// zero, so wall time reads as time since boot and
/// [`WallClock::is_synchronized`] reports `false`.
pub struct WallClock {
    offset: Mutex<Cell<Option<u64>>>,
}

impl WallClock {
    pub const fn new() -> Self {
        Self {
            offset: Mutex::new(Cell::new(None)),
        }
    }

    /// Record that wall-clock time was `wall` at monotonic instant `at`
    pub fn synchronize(&self, wall: Timestamp, at: Instant) {
        let offset = wall.as_micros().saturating_sub(at.as_micros());
        critical_section::with(|cs| self.offset.borrow(cs).set(Some(offset)));
    }

    /// Forget a previous synchronization
    pub fn invalidate(&self) {
        critical_section::with(|cs| self.offset.borrow(cs).set(None));
    }

    /// Has the clock been set against a reference
    pub fn is_synchronized(&self) -> bool {
        critical_section::with(|cs| self.offset.borrow(cs).get().is_some())
    }

    /// Wall-clock time at monotonic instant `at`
    pub fn now(&self, at: Instant) -> Timestamp {
        let offset = critical_section::with(|cs| self.offset.borrow(cs).get()).unwrap_or(0);
        Timestamp::from_micros(offset.saturating_add(at.as_micros()))
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-tick application time
///
/// Single writer: only the draw loop updates it.
pub struct FrameClock<'a> {
    wall: &'a WallClock,
    current: Instant,
    frame_start: Instant,
    delta: Duration,
    frames: u64,
}

impl<'a> FrameClock<'a> {
    pub const fn new(wall: &'a WallClock) -> Self {
        Self {
            wall,
            current: Instant::from_ticks(0),
            frame_start: Instant::from_ticks(0),
            delta: Duration::from_ticks(0),
            frames: 0,
        }
    }

    /// Record the current time without starting a frame
    pub fn update(&mut self, now: Instant) {
        self.current = now;
    }

    /// Start a new frame at `now` and compute the delta to the previous one
    pub fn new_frame(&mut self, now: Instant) {
        self.delta = if self.frames == 0 {
            Duration::from_ticks(0)
        } else {
            now.saturating_duration_since(self.frame_start)
        };
        self.frame_start = now;
        self.current = now;
        self.frames = self.frames.saturating_add(1);
    }

    pub const fn current_time(&self) -> Instant {
        self.current
    }

    pub const fn frame_start_time(&self) -> Instant {
        self.frame_start
    }

    pub const fn delta_time(&self) -> Duration {
        self.delta
    }

    /// Number of frames started so far
    pub const fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Time from `earlier` to the current time, zero if `earlier` is later
    pub fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.current.saturating_duration_since(earlier)
    }

    /// Wall-clock time matching the current time
    pub fn wall_now(&self) -> Timestamp {
        self.wall.now(self.current)
    }

    /// Wall-clock time at an arbitrary instant
    pub fn wall_at(&self, at: Instant) -> Timestamp {
        self.wall.now(at)
    }

    pub fn is_wall_clock_set(&self) -> bool {
        self.wall.is_synchronized()
    }
}
