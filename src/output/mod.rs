//! Hardware-facing output targets.
//!
//! The draw loop only talks to [`OutputTarget`]. Whether the pixels end up on
//! a set of strips or on a matrix is decided once at startup by picking an
//! [`OutputKind`].

mod matrix;
mod strip;

use embassy_time::{Duration, Instant};

pub use matrix::{MatrixLayout, MatrixOutput};
pub use strip::StripOutput;

use crate::color::Rgb;
use crate::error::Result;

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// Outputs are generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LEDs, already faded and in physical order
    fn write(&mut self, colors: &[Rgb]);

    /// Whether the hardware finished initializing
    fn is_ready(&self) -> bool {
        true
    }
}

/// What the draw loop needs from an output
pub trait OutputTarget {
    /// Drawing is gated until this returns `true`
    fn is_ready(&self) -> bool;

    /// Whether pixels staged for `channel` end up on LEDs
    fn displays(&self, channel: usize) -> bool;

    /// Stage pixels for a channel; nothing reaches the LEDs before `commit`
    fn set_pixels(&mut self, channel: usize, pixels: &[Rgb]);

    /// Push staged pixels to the hardware with `fader` applied.
    ///
    /// Returns the refresh rate the output is achieving.
    fn commit(&mut self, fader: u8, now: Instant) -> u32;

    /// Whether the next commit swaps buffers instead of copying forward
    fn set_double_buffered(&mut self, _enabled: bool) {}
}

/// Output variant chosen from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// One strip per channel
    Strip,
    /// A single matrix fed from channel 0
    Matrix(MatrixLayout),
}

/// Runtime-selected output
pub enum Output<D: OutputDriver, const CHANNELS: usize, const LEDS: usize> {
    Strip(StripOutput<D, CHANNELS, LEDS>),
    Matrix(MatrixOutput<D, LEDS>),
}

impl<D: OutputDriver, const CHANNELS: usize, const LEDS: usize> Output<D, CHANNELS, LEDS> {
    /// Build the output described by `kind`.
    ///
    /// A matrix uses the first driver and ignores the rest.
    pub fn from_kind(kind: OutputKind, drivers: [D; CHANNELS]) -> Result<Self> {
        match kind {
            OutputKind::Strip => Ok(Self::Strip(StripOutput::new(drivers))),
            OutputKind::Matrix(layout) => {
                let driver = drivers
                    .into_iter()
                    .next()
                    .ok_or(crate::Error::NoOutputDriver)?;
                Ok(Self::Matrix(MatrixOutput::new(driver, layout)?))
            }
        }
    }

    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Strip(_) => OutputKind::Strip,
            Self::Matrix(matrix) => OutputKind::Matrix(matrix.layout()),
        }
    }
}

impl<D: OutputDriver, const CHANNELS: usize, const LEDS: usize> OutputTarget
    for Output<D, CHANNELS, LEDS>
{
    fn is_ready(&self) -> bool {
        match self {
            Self::Strip(output) => output.is_ready(),
            Self::Matrix(output) => output.is_ready(),
        }
    }

    fn displays(&self, channel: usize) -> bool {
        match self {
            Self::Strip(output) => output.displays(channel),
            Self::Matrix(output) => output.displays(channel),
        }
    }

    fn set_pixels(&mut self, channel: usize, pixels: &[Rgb]) {
        match self {
            Self::Strip(output) => output.set_pixels(channel, pixels),
            Self::Matrix(output) => output.set_pixels(channel, pixels),
        }
    }

    fn commit(&mut self, fader: u8, now: Instant) -> u32 {
        match self {
            Self::Strip(output) => output.commit(fader, now),
            Self::Matrix(output) => output.commit(fader, now),
        }
    }

    fn set_double_buffered(&mut self, enabled: bool) {
        match self {
            Self::Strip(output) => output.set_double_buffered(enabled),
            Self::Matrix(output) => output.set_double_buffered(enabled),
        }
    }
}

/// Refresh rate measured over one-second windows
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    pub const fn new() -> Self {
        Self {
            window_start: None,
            frames: 0,
            fps: 0,
        }
    }

    /// Count a committed frame, returns the latest measured rate
    pub fn tick(&mut self, now: Instant) -> u32 {
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            self.frames = 0;
            return self.fps;
        };

        self.frames = self.frames.saturating_add(1);
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= Self::WINDOW {
            let frames = u64::from(self.frames) * 1_000_000;
            self.fps = u32::try_from(frames / elapsed.as_micros().max(1)).unwrap_or(u32::MAX);
            self.window_start = Some(now);
            self.frames = 0;
        }
        self.fps
    }

    pub const fn fps(&self) -> u32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy `pixels` into `out` with the fader applied
pub(crate) fn fade_into(out: &mut [Rgb], pixels: &[Rgb], fader: u8) {
    for (target, pixel) in out.iter_mut().zip(pixels) {
        *target = fade(*pixel, fader);
    }
}

pub(crate) const fn fade(pixel: Rgb, fader: u8) -> Rgb {
    use crate::math8::scale8;

    if fader == 255 {
        return pixel;
    }
    Rgb {
        r: scale8(pixel.r, fader),
        g: scale8(pixel.g, fader),
        b: scale8(pixel.b, fader),
    }
}
