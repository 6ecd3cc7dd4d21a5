//! Per-channel queue of timestamped frames.
//!
//! Frames are kept in arrival order, which the producer guarantees is also
//! non-decreasing timestamp order. The queue never re-sorts.

use heapless::Deque;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::diagnostics::BufferAge;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::timestamp::Timestamp;

/// What to do when a frame arrives at a full queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Evict the oldest buffered frame to make room
    #[default]
    DropOldest,
    /// Keep the buffered frames and refuse the new one
    RejectNewest,
}

/// Bounded FIFO of frames for one channel
///
/// `LEDS` is the channel pixel capacity, `DEPTH` the number of frames held.
#[derive(Debug)]
pub struct BufferQueue<const LEDS: usize, const DEPTH: usize> {
    frames: Deque<Frame<LEDS>, DEPTH>,
    overflow: OverflowPolicy,
    dropped: u32,
}

impl<const LEDS: usize, const DEPTH: usize> BufferQueue<LEDS, DEPTH> {
    pub const fn new(overflow: OverflowPolicy) -> Self {
        Self {
            frames: Deque::new(),
            overflow,
            dropped: 0,
        }
    }

    /// Append a frame
    ///
    /// Returns the evicted frame when the queue was full and the policy is
    /// [`OverflowPolicy::DropOldest`].
    pub fn push_frame(&mut self, frame: Frame<LEDS>) -> Result<Option<Frame<LEDS>>> {
        let mut evicted = None;
        if self.frames.is_full() {
            match self.overflow {
                OverflowPolicy::RejectNewest => {
                    self.dropped = self.dropped.saturating_add(1);
                    return Err(Error::QueueFull);
                }
                OverflowPolicy::DropOldest => {
                    evicted = self.frames.pop_front();
                    self.dropped = self.dropped.saturating_add(1);
                    #[cfg(feature = "esp32-log")]
                    println!("[BufferQueue.push_frame] queue full, dropped oldest frame");
                }
            }
        }
        self.frames.push_back(frame).map_err(|_| Error::QueueFull)?;
        Ok(evicted)
    }

    pub fn set_overflow_policy(&mut self, overflow: OverflowPolicy) {
        self.overflow = overflow;
    }

    pub const fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub const fn capacity(&self) -> usize {
        DEPTH
    }

    /// Frames lost to overflow since creation
    pub const fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn peek_oldest(&self) -> Option<&Frame<LEDS>> {
        self.frames.front()
    }

    pub fn peek_newest(&self) -> Option<&Frame<LEDS>> {
        self.frames.back()
    }

    /// Remove and return the oldest frame, `None` if the queue is empty
    pub fn pop_oldest(&mut self) -> Option<Frame<LEDS>> {
        self.frames.pop_front()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Pick the frame to show this tick.
    ///
    /// Without a synchronized clock timestamps cannot be compared with
    /// `now`, so exactly one frame is popped in arrival order. With one,
    /// every due frame is popped and only the last of them is returned; a
    /// channel that fell behind skips straight to live.
    pub fn drain_due(&mut self, now: Timestamp, synchronized: bool) -> Option<Frame<LEDS>> {
        if !synchronized {
            return self.pop_oldest();
        }

        let mut latest = None;
        while self.peek_oldest().is_some_and(|frame| frame.is_due(now)) {
            latest = self.pop_oldest();
        }
        latest
    }

    /// Age of the oldest and newest buffered frames, zero when empty
    pub fn ages(&self, now: Timestamp) -> BufferAge {
        match (self.peek_oldest(), self.peek_newest()) {
            (Some(oldest), Some(newest)) => BufferAge {
                oldest_micros: oldest.timestamp().age_at(now),
                newest_micros: newest.timestamp().age_at(now),
            },
            _ => BufferAge::default(),
        }
    }

    /// Timestamp of the next frame waiting to be shown
    pub fn next_due(&self) -> Option<Timestamp> {
        self.peek_oldest().map(Frame::timestamp)
    }
}

impl<const LEDS: usize, const DEPTH: usize> Default for BufferQueue<LEDS, DEPTH> {
    fn default() -> Self {
        Self::new(OverflowPolicy::default())
    }
}
