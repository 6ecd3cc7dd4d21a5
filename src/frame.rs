use heapless::Vec;

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::timestamp::Timestamp;

/// One timestamped pixel payload for one channel
///
/// Immutable once built. Whoever holds the value owns it; popping it from a
/// queue hands it to the draw loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<const LEDS: usize> {
    timestamp: Timestamp,
    pixels: Vec<Rgb, LEDS>,
}

impl<const LEDS: usize> Frame<LEDS> {
    /// Build a frame, rejecting payloads that do not fit the channel
    pub fn new(timestamp: Timestamp, pixels: &[Rgb]) -> Result<Self> {
        let pixels = Vec::from_slice(pixels).map_err(|()| Error::TooManyPixels {
            count: pixels.len(),
            capacity: LEDS,
        })?;
        Ok(Self { timestamp, pixels })
    }

    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Frame timestamp is at or before `now`
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.timestamp.is_due(now)
    }
}
