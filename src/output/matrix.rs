use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::{FpsCounter, OutputDriver, OutputTarget, fade};
use crate::color::{BLACK, Rgb};
use crate::error::{Error, Result};

/// Physical wiring of a matrix
///
/// Frames arrive row-major. With `serpentine` wiring every odd row runs
/// right to left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixLayout {
    pub width: u16,
    pub height: u16,
    pub serpentine: bool,
}

impl MatrixLayout {
    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Physical LED index of the logical pixel at `(x, y)`
    pub const fn index(self, x: u16, y: u16) -> usize {
        let width = self.width as usize;
        let row = y as usize * width;
        if self.serpentine && y % 2 == 1 {
            row + (width - 1 - x as usize)
        } else {
            row + x as usize
        }
    }

    /// Physical LED index of a row-major logical index
    #[allow(clippy::cast_possible_truncation)]
    pub const fn physical(self, logical: usize) -> usize {
        if self.width == 0 {
            return logical;
        }
        let width = self.width as usize;
        self.index((logical % width) as u16, (logical / width) as u16)
    }
}

/// A single matrix with front and back buffers
///
/// Pixels are staged into the back buffer. On commit the back buffer either
/// becomes the front buffer (double-buffered effects) or is copied forward,
/// leaving it intact for effects that draw incrementally.
pub struct MatrixOutput<D: OutputDriver, const LEDS: usize> {
    driver: D,
    layout: MatrixLayout,
    front: [Rgb; LEDS],
    back: [Rgb; LEDS],
    scratch: [Rgb; LEDS],
    double_buffered: bool,
    staged: bool,
    fps: FpsCounter,
}

impl<D: OutputDriver, const LEDS: usize> MatrixOutput<D, LEDS> {
    pub fn new(driver: D, layout: MatrixLayout) -> Result<Self> {
        if layout.pixel_count() > LEDS {
            return Err(Error::LayoutTooLarge {
                pixels: layout.pixel_count(),
                capacity: LEDS,
            });
        }
        Ok(Self {
            driver,
            layout,
            front: [BLACK; LEDS],
            back: [BLACK; LEDS],
            scratch: [BLACK; LEDS],
            double_buffered: false,
            staged: false,
            fps: FpsCounter::new(),
        })
    }

    pub const fn layout(&self) -> MatrixLayout {
        self.layout
    }

    /// Pixels currently on display, row-major, without the fader
    pub fn front(&self) -> &[Rgb] {
        &self.front[..self.layout.pixel_count()]
    }

    pub const fn driver(&self) -> &D {
        &self.driver
    }
}

impl<D: OutputDriver, const LEDS: usize> OutputTarget for MatrixOutput<D, LEDS> {
    fn is_ready(&self) -> bool {
        self.driver.is_ready()
    }

    fn displays(&self, channel: usize) -> bool {
        channel == 0
    }

    fn set_pixels(&mut self, channel: usize, pixels: &[Rgb]) {
        if channel != 0 {
            #[cfg(feature = "esp32-log")]
            println!("[MatrixOutput.set_pixels] ignoring channel {}", channel);
            return;
        }
        let count = pixels.len().min(self.layout.pixel_count());
        self.back[..count].copy_from_slice(&pixels[..count]);
        self.staged = true;
    }

    fn commit(&mut self, fader: u8, now: Instant) -> u32 {
        if self.staged {
            if self.double_buffered {
                core::mem::swap(&mut self.front, &mut self.back);
            } else {
                self.front.copy_from_slice(&self.back);
            }

            let count = self.layout.pixel_count();
            for (logical, pixel) in self.front[..count].iter().enumerate() {
                if let Some(slot) = self.scratch.get_mut(self.layout.physical(logical)) {
                    *slot = fade(*pixel, fader);
                }
            }
            self.driver.write(&self.scratch[..count]);
            self.staged = false;
        }
        self.fps.tick(now)
    }

    fn set_double_buffered(&mut self, enabled: bool) {
        self.double_buffered = enabled;
    }
}
