use embassy_time::Instant;
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::{FpsCounter, OutputDriver, OutputTarget, fade_into};
use crate::color::{BLACK, Rgb};

/// One driver per channel, each fed its own pixels
pub struct StripOutput<D: OutputDriver, const CHANNELS: usize, const LEDS: usize> {
    drivers: [D; CHANNELS],
    pixels: [Vec<Rgb, LEDS>; CHANNELS],
    staged: [bool; CHANNELS],
    scratch: [Rgb; LEDS],
    fps: FpsCounter,
}

impl<D: OutputDriver, const CHANNELS: usize, const LEDS: usize> StripOutput<D, CHANNELS, LEDS> {
    pub fn new(drivers: [D; CHANNELS]) -> Self {
        Self {
            drivers,
            pixels: [const { Vec::new() }; CHANNELS],
            staged: [false; CHANNELS],
            scratch: [BLACK; LEDS],
            fps: FpsCounter::new(),
        }
    }

    /// Pixels last staged for a channel, as stored (no fader applied)
    pub fn pixels(&self, channel: usize) -> &[Rgb] {
        self.pixels.get(channel).map_or(&[], |pixels| pixels.as_slice())
    }

    pub fn driver(&self, channel: usize) -> Option<&D> {
        self.drivers.get(channel)
    }
}

impl<D: OutputDriver, const CHANNELS: usize, const LEDS: usize> OutputTarget
    for StripOutput<D, CHANNELS, LEDS>
{
    fn is_ready(&self) -> bool {
        self.drivers.iter().all(OutputDriver::is_ready)
    }

    fn displays(&self, channel: usize) -> bool {
        channel < CHANNELS
    }

    fn set_pixels(&mut self, channel: usize, pixels: &[Rgb]) {
        let (Some(stored), Some(staged)) = (self.pixels.get_mut(channel), self.staged.get_mut(channel))
        else {
            #[cfg(feature = "esp32-log")]
            println!("[StripOutput.set_pixels] no channel {}", channel);
            return;
        };
        *stored = pixels.iter().copied().take(LEDS).collect();
        *staged = true;
    }

    fn commit(&mut self, fader: u8, now: Instant) -> u32 {
        let channels = self
            .drivers
            .iter_mut()
            .zip(self.pixels.iter())
            .zip(self.staged.iter_mut());
        for ((driver, pixels), staged) in channels {
            if !*staged {
                continue;
            }
            let frame = &mut self.scratch[..pixels.len()];
            fade_into(frame, pixels, fader);
            driver.write(frame);
            *staged = false;
        }
        self.fps.tick(now)
    }
}
