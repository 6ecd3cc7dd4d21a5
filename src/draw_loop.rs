//! The draw loop: one tick picks a frame source, commits the frame and
//! decides how long to idle.
//!
//! Network frames win whenever a channel has one due. Local effects only
//! take over after the network has been quiet for longer than
//! `local_draw_timeout`, so a single late network frame does not flicker
//! the strip over to local content and back.

use embassy_time::{Duration, Instant, Timer};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::clock::{FrameClock, TimeSource, WallClock};
use crate::color::{BLACK, Rgb};
use crate::diagnostics::Diagnostics;
use crate::effect::EffectEngine;
use crate::frame::Frame;
use crate::frame_queues::FrameQueues;
use crate::link::LinkStatus;
use crate::maintenance::MaintenanceFlag;
use crate::output::OutputTarget;
use crate::output_stage::{OutputStage, ShowOutcome};
use crate::pacer::{FramePacer, PaceRequest, PacerTimings, Pacing};
use crate::power::PowerBudget;
use crate::timestamp::Timestamp;

/// How long the network must stay quiet before local effects take over
pub const DEFAULT_LOCAL_DRAW_TIMEOUT: Duration = Duration::from_secs(2);

/// Retry delay while hardware or the effect engine is initializing
pub const DEFAULT_NOT_READY_DELAY: Duration = Duration::from_millis(100);

/// Extra idle per tick while a firmware update is in progress
pub const DEFAULT_MAINTENANCE_DELAY: Duration = Duration::from_millis(100);

/// Configuration for the draw loop
#[derive(Debug, Clone, Copy)]
pub struct DrawLoopConfig {
    pub local_draw_timeout: Duration,
    /// Requested brightness before power limiting
    pub brightness: u8,
    pub power: PowerBudget,
    pub pacing: PacerTimings,
    pub not_ready_delay: Duration,
    pub maintenance_delay: Duration,
}

impl Default for DrawLoopConfig {
    fn default() -> Self {
        Self {
            local_draw_timeout: DEFAULT_LOCAL_DRAW_TIMEOUT,
            brightness: 255,
            power: PowerBudget::default(),
            pacing: PacerTimings::default(),
            not_ready_delay: DEFAULT_NOT_READY_DELAY,
            maintenance_delay: DEFAULT_MAINTENANCE_DELAY,
        }
    }
}

/// State shared with the collaborators that feed the draw loop
#[derive(Clone, Copy)]
pub struct DrawLoopShared<'a, const CHANNELS: usize, const LEDS: usize, const DEPTH: usize> {
    pub queues: &'a FrameQueues<CHANNELS, LEDS, DEPTH>,
    pub wall_clock: &'a WallClock,
    pub maintenance: &'a MaintenanceFlag,
    /// Network link gate; `None` when frames arrive without a link to watch
    pub link: Option<&'a LinkStatus>,
}

/// Where this tick's frame came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drawn {
    /// `channels` channels got a network frame; `pixels` is the longest
    Network { channels: usize, pixels: usize },
    /// The effect engine rendered every channel
    Local { pixels: usize },
    Nothing,
}

/// Result of a local draw attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalDraw {
    Drawn,
    /// The network delivered a frame too recently
    Suppressed,
    NoEffects,
    NotReady,
}

/// Everything one tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub drawn: Drawn,
    /// Local draw attempt, `None` when a network frame was drawn
    pub local: Option<LocalDraw>,
    pub show: ShowOutcome,
    /// Pacer decision, `None` when the tick backed off for initialization
    pub pacing: Option<Pacing>,
    /// Total time to idle before the next tick
    pub sleep: Duration,
}

/// Scheduling state owned by the loop
struct DrawState<'a, const CHANNELS: usize, const LEDS: usize> {
    clock: FrameClock<'a>,
    last_network_draw: Option<Instant>,
    frames: [[Rgb; LEDS]; CHANNELS],
    shown: [Option<usize>; CHANNELS],
    next_due: [Option<Timestamp>; CHANNELS],
    diagnostics: Diagnostics<CHANNELS>,
}

/// Draw Loop - the main orchestrator
pub struct DrawLoop<
    'a,
    O: OutputTarget,
    E: EffectEngine,
    T: TimeSource,
    const CHANNELS: usize,
    const LEDS: usize,
    const DEPTH: usize,
> {
    // External dependencies and configuration
    queues: &'a FrameQueues<CHANNELS, LEDS, DEPTH>,
    maintenance: &'a MaintenanceFlag,
    link: Option<&'a LinkStatus>,
    effects: E,
    time: T,
    config: DrawLoopConfig,

    // Internal state
    state: DrawState<'a, CHANNELS, LEDS>,
    started: bool,

    // Internal dependencies
    stage: OutputStage<O>,
    pacer: FramePacer,
}

impl<'a, O, E, T, const CHANNELS: usize, const LEDS: usize, const DEPTH: usize>
    DrawLoop<'a, O, E, T, CHANNELS, LEDS, DEPTH>
where
    O: OutputTarget,
    E: EffectEngine,
    T: TimeSource,
{
    pub fn new(
        shared: DrawLoopShared<'a, CHANNELS, LEDS, DEPTH>,
        output: O,
        effects: E,
        time: T,
        config: &DrawLoopConfig,
    ) -> Self {
        Self {
            queues: shared.queues,
            maintenance: shared.maintenance,
            link: shared.link,
            effects,
            time,
            config: *config,
            state: DrawState {
                clock: FrameClock::new(shared.wall_clock),
                last_network_draw: None,
                frames: [[BLACK; LEDS]; CHANNELS],
                shown: [None; CHANNELS],
                next_due: [None; CHANNELS],
                diagnostics: Diagnostics::new(),
            },
            started: false,
            stage: OutputStage::new(output, config.power, config.brightness),
            pacer: FramePacer::new(config.pacing),
        }
    }

    /// Start the first effect; later calls do nothing
    pub fn start(&mut self) {
        if !self.started {
            self.effects.start_effect();
            self.started = true;
        }
    }

    /// Run forever, sleeping between ticks as the pacer decides
    pub async fn run(&mut self) -> ! {
        self.start();
        loop {
            let report = self.tick();
            if report.sleep == Duration::from_ticks(0) {
                embassy_futures::yield_now().await;
            } else {
                Timer::after(report.sleep).await;
            }
        }
    }

    /// Run one tick without sleeping.
    ///
    /// The returned report carries the time to idle before the next call.
    pub fn tick(&mut self) -> TickReport {
        let frame_start = self.time.now();
        self.state.clock.update(frame_start);
        self.start();

        if !self.stage.is_ready() {
            #[cfg(feature = "esp32-log")]
            println!("[DrawLoop.tick] drawing before LEDs are ready, delaying");
            return self.back_off(Drawn::Nothing, None, ShowOutcome::NotReady);
        }

        self.state.shown = [None; CHANNELS];
        let channels = self.network_draw(frame_start);
        let (drawn, local) = if channels > 0 {
            let pixels = self.state.shown.iter().flatten().copied().max().unwrap_or(0);
            (Drawn::Network { channels, pixels }, None)
        } else {
            let local = self.local_draw(frame_start);
            let drawn = match local {
                LocalDraw::Drawn => Drawn::Local { pixels: LEDS },
                _ => Drawn::Nothing,
            };
            (drawn, Some(local))
        };

        let double_buffered = self.effects.requires_double_buffering();
        let show = self.stage.show(
            &self.state.frames,
            &self.state.shown,
            double_buffered,
            self.time.now(),
        );
        if let ShowOutcome::Committed(report) = &show {
            self.state.diagnostics.record_commit(report);
        }

        if local == Some(LocalDraw::NotReady) || show == ShowOutcome::NotReady {
            return self.back_off(drawn, local, show);
        }

        let now = self.time.now();
        self.state.clock.update(now);
        let pacing = self.pacer.pace(self.pace_request(drawn, frame_start, now));
        self.state.diagnostics.free_draw_time = pacing.sleep;

        TickReport {
            drawn,
            local,
            show,
            pacing: Some(pacing),
            sleep: self.with_maintenance(pacing.sleep),
        }
    }

    /// Whether a local effect may draw at `now`
    ///
    /// Allowed if the network never delivered a frame, or its last frame is
    /// older than the configured timeout.
    pub fn local_draw_allowed(&self, now: Instant) -> bool {
        self.state.last_network_draw.is_none_or(|last| {
            now.saturating_duration_since(last) > self.config.local_draw_timeout
        })
    }

    pub const fn diagnostics(&self) -> &Diagnostics<CHANNELS> {
        &self.state.diagnostics
    }

    pub const fn clock(&self) -> &FrameClock<'a> {
        &self.state.clock
    }

    pub const fn last_network_draw(&self) -> Option<Instant> {
        self.state.last_network_draw
    }

    /// Render target of a channel, as last drawn
    pub fn frame(&self, channel: usize) -> Option<&[Rgb; LEDS]> {
        self.state.frames.get(channel)
    }

    pub const fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    pub const fn output(&self) -> &O {
        self.stage.output()
    }

    pub fn output_mut(&mut self) -> &mut O {
        self.stage.output_mut()
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.stage.set_brightness(brightness);
    }

    /// Drain every channel and copy due frames into the render targets.
    ///
    /// The queue lock is held only while draining; frames are owned by the
    /// loop once popped. Empty frames are consumed but do not count as a
    /// draw. Returns the number of channels drawn.
    fn network_draw(&mut self, now: Instant) -> usize {
        if self.link.is_some_and(|link| !link.is_up()) {
            self.state.next_due = [None; CHANNELS];
            return 0;
        }

        let wall_now = self.state.clock.wall_now();
        let synchronized = self.state.clock.is_wall_clock_set();

        let mut popped: [Option<Frame<LEDS>>; CHANNELS] = [const { None }; CHANNELS];
        let next_due = &mut self.state.next_due;
        let ages = &mut self.state.diagnostics.buffer_ages;
        self.queues.with_queues(|queues| {
            let channels = queues
                .iter_mut()
                .zip(popped.iter_mut())
                .zip(next_due.iter_mut())
                .zip(ages.iter_mut());
            for (((queue, frame), next), age) in channels {
                *frame = queue.drain_due(wall_now, synchronized);
                *age = queue.ages(wall_now);
                *next = queue.next_due();
            }
        });

        let mut drawn = 0;
        let targets = self.state.frames.iter_mut().zip(self.state.shown.iter_mut());
        for (frame, (target, shown)) in popped.into_iter().zip(targets) {
            let Some(frame) = frame.filter(|frame| !frame.is_empty()) else {
                continue;
            };
            if drawn == 0 {
                self.state.clock.new_frame(now);
                self.state.last_network_draw = Some(now);
            }
            let count = frame.len().min(LEDS);
            target[..count].copy_from_slice(&frame.pixels()[..count]);
            *shown = Some(count);
            drawn += 1;
        }

        self.state.diagnostics.last_network_draw = self.state.last_network_draw;
        drawn
    }

    /// Ask the effect engine for a frame, mirrored to every channel
    fn local_draw(&mut self, now: Instant) -> LocalDraw {
        if !self.effects.is_ready() {
            #[cfg(feature = "esp32-log")]
            println!("[DrawLoop.local_draw] effect engine not ready, delaying");
            return LocalDraw::NotReady;
        }
        if self.effects.effect_count() == 0 {
            return LocalDraw::NoEffects;
        }
        if !self.local_draw_allowed(now) {
            #[cfg(feature = "esp32-log")]
            println!("[DrawLoop.local_draw] network frame drawn recently, skipping local effect");
            return LocalDraw::Suppressed;
        }

        self.state.clock.new_frame(now);
        let Some((first, rest)) = self.state.frames.split_first_mut() else {
            return LocalDraw::NoEffects;
        };
        self.effects.update(now, first);
        for other in rest {
            *other = *first;
        }
        self.state.shown = [Some(LEDS); CHANNELS];
        LocalDraw::Drawn
    }

    fn pace_request(&self, drawn: Drawn, frame_start: Instant, now: Instant) -> PaceRequest {
        match drawn {
            Drawn::Local { .. } => PaceRequest::Local {
                elapsed: now.saturating_duration_since(frame_start),
                desired_fps: self.effects.desired_frames_per_second(),
            },
            Drawn::Network { .. } | Drawn::Nothing => {
                let wall_now = self.state.clock.wall_at(now);
                let next_due = self
                    .state
                    .next_due
                    .iter()
                    .flatten()
                    .map(|due| due.until(wall_now))
                    .min();
                if matches!(drawn, Drawn::Nothing) && next_due.is_none() {
                    PaceRequest::Idle
                } else {
                    PaceRequest::Network { next_due }
                }
            }
        }
    }

    fn back_off(&mut self, drawn: Drawn, local: Option<LocalDraw>, show: ShowOutcome) -> TickReport {
        self.state.diagnostics.free_draw_time = self.config.not_ready_delay;
        TickReport {
            drawn,
            local,
            show,
            pacing: None,
            sleep: self.with_maintenance(self.config.not_ready_delay),
        }
    }

    fn with_maintenance(&self, sleep: Duration) -> Duration {
        if self.maintenance.is_active() {
            sleep + self.config.maintenance_delay
        } else {
            sleep
        }
    }
}
