//! Power budgeting for a committed frame.
//!
//! The estimate is linear in brightness, so the largest brightness that fits
//! a ceiling can be found with a binary search over `0..=255`. The default
//! coefficients describe a WS2812-class LED at 5 V; strips with other
//! emitters should be calibrated and configured explicitly.

use crate::color::Rgb;

/// Power drawn by one LED, in milliwatts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerModel {
    /// Red emitter at full output
    pub red_mw: u32,
    /// Green emitter at full output
    pub green_mw: u32,
    /// Blue emitter at full output
    pub blue_mw: u32,
    /// Quiescent draw of a dark LED
    pub idle_mw: u32,
}

impl PowerModel {
    /// WS2812B: 16 mA red, 11 mA green, 15 mA blue, 1 mA idle at 5 V
    pub const WS2812: Self = Self {
        red_mw: 16 * 5,
        green_mw: 11 * 5,
        blue_mw: 15 * 5,
        idle_mw: 5,
    };

    /// Color-weighted sum of the frame, `255 * mW` at full brightness
    fn weighted(&self, pixels: &[Rgb]) -> u64 {
        pixels
            .iter()
            .map(|pixel| {
                u64::from(pixel.r) * u64::from(self.red_mw)
                    + u64::from(pixel.g) * u64::from(self.green_mw)
                    + u64::from(pixel.b) * u64::from(self.blue_mw)
            })
            .sum()
    }

    fn idle(&self, pixels: &[Rgb]) -> u64 {
        pixels.len() as u64 * u64::from(self.idle_mw)
    }

    /// Estimated draw of the frame at full brightness
    pub fn unscaled_mw(&self, pixels: &[Rgb]) -> u32 {
        saturate(self.idle(pixels) + self.weighted(pixels) / 255)
    }

    /// Estimated draw of the frame with `brightness` applied as a fader
    ///
    /// Non-decreasing in `brightness`.
    pub fn estimate_mw(&self, pixels: &[Rgb], brightness: u8) -> u32 {
        let lit = self.weighted(pixels) * u64::from(brightness) / (255 * 255);
        saturate(self.idle(pixels) + lit)
    }

    /// Summed estimate of several channels at one brightness
    pub fn total_mw<'p>(&self, channels: impl IntoIterator<Item = &'p [Rgb]>, brightness: u8) -> u32 {
        channels
            .into_iter()
            .map(|pixels| self.estimate_mw(pixels, brightness))
            .fold(0, u32::saturating_add)
    }
}

impl Default for PowerModel {
    fn default() -> Self {
        Self::WS2812
    }
}

/// Power ceiling for everything one supply feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerLimit {
    Unlimited,
    Milliwatts(u32),
}

/// Model plus ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerBudget {
    pub model: PowerModel,
    pub limit: PowerLimit,
}

impl PowerBudget {
    /// 900 mA at 5 V
    pub const DEFAULT_LIMIT_MW: u32 = 4_500;

    pub const fn new(model: PowerModel, limit: PowerLimit) -> Self {
        Self { model, limit }
    }

    /// Largest brightness up to `requested` whose estimate fits the ceiling
    ///
    /// When even a dark frame exceeds the ceiling the result is zero.
    pub fn max_brightness(&self, pixels: &[Rgb], requested: u8) -> u8 {
        self.max_brightness_total([pixels], requested)
    }

    /// Largest brightness up to `requested` for several channels sharing
    /// one supply
    ///
    /// The ceiling bounds the summed estimate of every channel.
    pub fn max_brightness_total<'p, I>(&self, channels: I, requested: u8) -> u8
    where
        I: IntoIterator<Item = &'p [Rgb]> + Clone,
    {
        let PowerLimit::Milliwatts(ceiling) = self.limit else {
            return requested;
        };
        let fits = |brightness| self.model.total_mw(channels.clone(), brightness) <= ceiling;
        if fits(requested) {
            return requested;
        }

        // Invariant: estimate(low) fits or low == 0, estimate(high) does not
        let mut low = 0u8;
        let mut high = requested;
        while high - low > 1 {
            let mid = low + (high - low) / 2;
            if fits(mid) {
                low = mid;
            } else {
                high = mid;
            }
        }
        low
    }
}

impl Default for PowerBudget {
    fn default() -> Self {
        Self::new(
            PowerModel::WS2812,
            PowerLimit::Milliwatts(Self::DEFAULT_LIMIT_MW),
        )
    }
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
