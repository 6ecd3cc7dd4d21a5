//! Power-limited commit of the chosen frame.
//!
//! Pixels are handed to the output untouched; the brightness cap travels as
//! a fader applied at commit time, so stored frames stay reusable. The
//! summed draw of every displayed channel is held under one ceiling, no
//! matter where the frames came from.

use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::Rgb;
use crate::diagnostics::CommitReport;
use crate::math8::percent8;
use crate::output::OutputTarget;
use crate::power::PowerBudget;

/// Outcome of pushing a tick's frames to the output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShowOutcome {
    /// Hardware is still initializing; nothing was sent
    NotReady,
    /// No channel had pixels this tick
    NothingToShow,
    Committed(CommitReport),
}

pub struct OutputStage<O: OutputTarget> {
    output: O,
    budget: PowerBudget,
    brightness: u8,
}

impl<O: OutputTarget> OutputStage<O> {
    pub const fn new(output: O, budget: PowerBudget, brightness: u8) -> Self {
        Self {
            output,
            budget,
            brightness,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.output.is_ready()
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Requested brightness before power limiting
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub const fn budget(&self) -> PowerBudget {
        self.budget
    }

    /// Largest fader that keeps the displayed channels, together, inside
    /// the ceiling
    pub fn fader_for<const LEDS: usize>(
        &self,
        frames: &[[Rgb; LEDS]],
        shown: &[Option<usize>],
    ) -> u8 {
        self.budget
            .max_brightness_total(self.visible(frames, shown), self.brightness)
    }

    /// Send the first `shown[channel]` pixels of each channel and commit.
    ///
    /// Channels with `None` in `shown`, or that the output does not display,
    /// are not touched.
    pub fn show<const LEDS: usize>(
        &mut self,
        frames: &[[Rgb; LEDS]],
        shown: &[Option<usize>],
        double_buffered: bool,
        now: Instant,
    ) -> ShowOutcome {
        if !self.output.is_ready() {
            #[cfg(feature = "esp32-log")]
            println!("[OutputStage.show] drawing before LEDs are ready");
            return ShowOutcome::NotReady;
        }
        if self.visible(frames, shown).next().is_none() {
            #[cfg(feature = "esp32-log")]
            println!("[OutputStage.show] draw loop ended without a draw");
            return ShowOutcome::NothingToShow;
        }

        let fader = self.fader_for(frames, shown);
        for (channel, (frame, count)) in frames.iter().zip(shown).enumerate() {
            if let Some(count) = count
                && self.output.displays(channel)
            {
                self.output.set_pixels(channel, &frame[..(*count).min(LEDS)]);
            }
        }

        self.output.set_double_buffered(double_buffered);
        let fps = self.output.commit(fader, now);
        let milliwatts = self.budget.model.total_mw(self.visible(frames, shown), fader);

        ShowOutcome::Committed(CommitReport {
            fader,
            fps,
            brightness_percent: percent8(fader),
            milliwatts,
        })
    }

    /// Pixels of every channel that was drawn and is displayed
    fn visible<'f, const LEDS: usize>(
        &'f self,
        frames: &'f [[Rgb; LEDS]],
        shown: &'f [Option<usize>],
    ) -> impl Iterator<Item = &'f [Rgb]> + Clone + 'f {
        frames
            .iter()
            .zip(shown)
            .enumerate()
            .filter(|(channel, _)| self.output.displays(*channel))
            .filter_map(|(_, (frame, count))| count.map(|count| &frame[..count.min(LEDS)]))
    }
}
