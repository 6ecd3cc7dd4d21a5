#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use led_frame_scheduler::{EffectEngine, Instant, OutputDriver, Rgb, TimeSource};

pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

/// Monotonic time in microseconds, advanced by hand
pub struct ManualTime<'a>(pub &'a Cell<u64>);

impl TimeSource for ManualTime<'_> {
    fn now(&self) -> Instant {
        Instant::from_micros(self.0.get())
    }
}

/// Driver that records every write
#[derive(Clone)]
pub struct RecordingDriver {
    pub writes: Rc<RefCell<Vec<Vec<Rgb>>>>,
    pub ready: Rc<Cell<bool>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self {
            writes: Rc::new(RefCell::new(Vec::new())),
            ready: Rc::new(Cell::new(true)),
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    pub fn last_write(&self) -> Option<Vec<Rgb>> {
        self.writes.borrow().last().cloned()
    }
}

impl OutputDriver for RecordingDriver {
    fn write(&mut self, colors: &[Rgb]) {
        self.writes.borrow_mut().push(colors.to_vec());
    }

    fn is_ready(&self) -> bool {
        self.ready.get()
    }
}

/// Effect engine that fills with one color and takes `render_cost` to do it
pub struct ScriptedEngine<'a> {
    pub time: &'a Cell<u64>,
    pub render_cost_micros: u64,
    pub fps: f32,
    pub effects: usize,
    pub color: Rgb,
    pub ready: bool,
    pub double_buffered: bool,
    pub starts: usize,
    pub updates: usize,
}

impl<'a> ScriptedEngine<'a> {
    pub fn new(time: &'a Cell<u64>) -> Self {
        Self {
            time,
            render_cost_micros: 0,
            fps: 50.0,
            effects: 1,
            color: BLUE,
            ready: true,
            double_buffered: false,
            starts: 0,
            updates: 0,
        }
    }
}

impl EffectEngine for ScriptedEngine<'_> {
    fn effect_count(&self) -> usize {
        self.effects
    }

    fn start_effect(&mut self) {
        self.starts += 1;
    }

    fn update(&mut self, _now: Instant, leds: &mut [Rgb]) {
        self.updates += 1;
        leds.fill(self.color);
        self.time.set(self.time.get() + self.render_cost_micros);
    }

    fn desired_frames_per_second(&self) -> f32 {
        self.fps
    }

    fn requires_double_buffering(&self) -> bool {
        self.double_buffered
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}
