//! Read-only figures for operational tooling.
//!
//! Nothing in the draw loop makes decisions from these values.

use embassy_time::{Duration, Instant};

/// Age of the buffered frames on one channel, measured after draining
///
/// Ages are `now - timestamp` in microseconds, so a frame that is not yet
/// due has a negative age. Both are zero when the queue is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferAge {
    pub oldest_micros: i64,
    pub newest_micros: i64,
}

/// Figures reported by the output stage after a commit
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CommitReport {
    /// Brightness fader the frame was committed with
    pub fader: u8,
    /// Refresh rate reported by the output
    pub fps: u32,
    /// Share of full brightness the power ceiling allowed (0.0-100.0)
    pub brightness_percent: f32,
    /// Estimated draw of the committed frame at the applied fader
    pub milliwatts: u32,
}

/// Snapshot of the draw loop
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics<const CHANNELS: usize> {
    pub fps: u32,
    pub brightness_percent: f32,
    pub milliwatts: u32,
    /// Sleep chosen by the pacer on the last tick
    pub free_draw_time: Duration,
    pub buffer_ages: [BufferAge; CHANNELS],
    pub last_network_draw: Option<Instant>,
}

impl<const CHANNELS: usize> Diagnostics<CHANNELS> {
    pub const fn new() -> Self {
        Self {
            fps: 0,
            brightness_percent: 0.0,
            milliwatts: 0,
            free_draw_time: Duration::from_ticks(0),
            buffer_ages: [BufferAge {
                oldest_micros: 0,
                newest_micros: 0,
            }; CHANNELS],
            last_network_draw: None,
        }
    }

    /// Fold the output stage figures in
    pub fn record_commit(&mut self, report: &CommitReport) {
        self.fps = report.fps;
        self.brightness_percent = report.brightness_percent;
        self.milliwatts = report.milliwatts;
    }

    /// Estimated draw in whole watts
    pub const fn watts(&self) -> u32 {
        self.milliwatts / 1000
    }
}

impl<const CHANNELS: usize> Default for Diagnostics<CHANNELS> {
    fn default() -> Self {
        Self::new()
    }
}
