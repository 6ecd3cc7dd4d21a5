//! Wall-clock timestamps carried by network frames.
//!
//! A timestamp is the moment a frame should appear on the LEDs, expressed the
//! way the wire carries it: whole seconds plus a microsecond remainder. It is
//! compared against wall-clock time, never against monotonic ticks.

use embassy_time::Duration;

pub const MICROS_PER_SECOND: u64 = 1_000_000;

/// Seconds + sub-second microseconds
///
/// Field order matters: the derived ordering compares seconds first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    seconds: u64,
    micros: u32,
}

impl Timestamp {
    pub const ZERO: Self = Self {
        seconds: 0,
        micros: 0,
    };

    /// Create a timestamp, carrying whole seconds out of `micros`
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(seconds: u64, micros: u32) -> Self {
        let carry = micros as u64 / MICROS_PER_SECOND;
        Self {
            seconds: seconds.saturating_add(carry),
            micros: (micros as u64 % MICROS_PER_SECOND) as u32,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_micros(total: u64) -> Self {
        Self {
            seconds: total / MICROS_PER_SECOND,
            micros: (total % MICROS_PER_SECOND) as u32,
        }
    }

    pub const fn seconds(self) -> u64 {
        self.seconds
    }

    pub const fn micros(self) -> u32 {
        self.micros
    }

    /// Total microseconds, saturating on overflow
    pub const fn as_micros(self) -> u64 {
        self.seconds
            .saturating_mul(MICROS_PER_SECOND)
            .saturating_add(self.micros as u64)
    }

    /// A frame is due once its timestamp is at or before `now`
    pub fn is_due(self, now: Self) -> bool {
        self <= now
    }

    /// Signed age in microseconds (`now - self`)
    ///
    /// Negative while the timestamp is still in the future.
    pub fn age_at(self, now: Self) -> i64 {
        let now = i128::from(now.as_micros());
        let this = i128::from(self.as_micros());
        i64::try_from(now - this).unwrap_or(if now > this { i64::MAX } else { i64::MIN })
    }

    /// Time left until the timestamp becomes due, zero if it already is
    pub fn until(self, now: Self) -> Duration {
        Duration::from_micros(self.as_micros().saturating_sub(now.as_micros()))
    }
}
